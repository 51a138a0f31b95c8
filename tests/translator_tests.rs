//! Translator integration tests
//!
//! Drives whole chat requests through the public translation API and checks
//! the canonical output as JSON. Covers Claude tool blocks, OpenAI tool calls,
//! conversations mixing both, and the request-level settings around them.

use serde_json::{Value, json};
use toolbridge::translator::{self, THOUGHT_SIGNATURE};
use toolbridge::{BridgeError, CorrelationPolicy, RequestTranslator, TranslateOptions};

const MODEL: &str = "gemini-2.5-pro";

fn translate(input: Value) -> Value {
    let body = serde_json::to_vec(&input).unwrap();
    let output = translator::translate(MODEL, &body, false).unwrap();
    serde_json::from_slice(&output).unwrap()
}

fn strict_translator() -> RequestTranslator {
    RequestTranslator::new(TranslateOptions {
        correlation_policy: CorrelationPolicy::Strict,
        ..TranslateOptions::default()
    })
}

/// Every functionCall part must carry the signature next to it
fn assert_signed_calls(output: &Value) {
    for turn in output["request"]["contents"].as_array().unwrap() {
        for part in turn["parts"].as_array().unwrap() {
            if part.get("functionCall").is_some() {
                assert_eq!(part["thoughtSignature"], THOUGHT_SIGNATURE, "unsigned call: {}", part);
            }
        }
    }
}

/// No turn may be emitted without parts
fn assert_no_empty_turns(output: &Value) {
    for (i, turn) in output["request"]["contents"].as_array().unwrap().iter().enumerate() {
        let parts = turn["parts"].as_array().unwrap();
        assert!(!parts.is_empty(), "turn {} has no parts", i);
    }
}

#[test]
fn test_claude_tool_definition() {
    let output = translate(json!({
        "messages": [{"role": "user", "content": "Hello"}],
        "tools": [{
            "name": "Shell",
            "description": "Run a shell command",
            "input_schema": {
                "type": "object",
                "properties": {"command": {"type": "string"}},
                "required": ["command"]
            }
        }]
    }));

    let decl = &output["request"]["tools"][0]["functionDeclarations"][0];
    assert_eq!(decl["name"], "Shell");
    assert_eq!(decl["description"], "Run a shell command");
    assert_eq!(decl["parametersJsonSchema"]["properties"]["command"]["type"], "string");
    assert_eq!(decl["parametersJsonSchema"]["required"], json!(["command"]));
    assert!(!output.to_string().contains("input_schema"));
}

#[test]
fn test_mixed_tool_definition_formats_keep_order() {
    let output = translate(json!({
        "messages": [{"role": "user", "content": "Hello"}],
        "tools": [
            {
                "type": "function",
                "function": {
                    "name": "openai_tool",
                    "description": "OpenAI format",
                    "parameters": {"type": "object", "properties": {}}
                }
            },
            {
                "name": "claude_tool",
                "description": "Claude format",
                "input_schema": {"type": "object", "properties": {}}
            }
        ]
    }));

    let decls = output["request"]["tools"][0]["functionDeclarations"].as_array().unwrap();
    let names: Vec<&str> = decls.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["openai_tool", "claude_tool"]);
}

#[test]
fn test_tool_without_schema_is_dropped() {
    let output = translate(json!({
        "messages": [{"role": "user", "content": "Hello"}],
        "tools": [{"name": "NoParamsTool", "description": "A tool with no parameters"}]
    }));

    assert!(output["request"].get("tools").is_none());
}

#[test]
fn test_claude_tool_use_with_text() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "List files"},
            {
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Let me check."},
                    {"type": "tool_use", "id": "call_1", "name": "Shell", "input": {"command": "ls"}}
                ]
            }
        ]
    }));

    let turn = &output["request"]["contents"][1];
    assert_eq!(turn["role"], "model");
    assert_eq!(turn["parts"][0]["text"], "Let me check.");
    assert_eq!(turn["parts"][1]["functionCall"]["id"], "call_1");
    assert_eq!(turn["parts"][1]["functionCall"]["name"], "Shell");
    assert_eq!(turn["parts"][1]["functionCall"]["args"], json!({"command": "ls"}));
    assert_signed_calls(&output);
}

#[test]
fn test_claude_tool_result_array_content() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "List files"},
            {
                "role": "assistant",
                "content": [{"type": "tool_use", "id": "call_abc123", "name": "Shell", "input": {"command": "ls -la"}}]
            },
            {
                "role": "user",
                "content": [{
                    "type": "tool_result",
                    "tool_use_id": "call_abc123",
                    "content": [{"type": "text", "text": "file1.txt\nfile2.txt"}]
                }]
            }
        ]
    }));

    let contents = output["request"]["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);

    let response = &contents[2]["parts"][0]["functionResponse"];
    assert_eq!(contents[2]["role"], "user");
    assert_eq!(response["id"], "call_abc123");
    assert_eq!(response["name"], "Shell");
    assert_eq!(response["response"]["result"], "file1.txt\nfile2.txt");
}

#[test]
fn test_claude_tool_result_string_content() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "Run command"},
            {
                "role": "assistant",
                "content": [{"type": "tool_use", "id": "call_def456", "name": "Shell", "input": {"command": "echo hello"}}]
            },
            {
                "role": "user",
                "content": [{"type": "tool_result", "tool_use_id": "call_def456", "content": "hello"}]
            }
        ]
    }));

    let response = &output["request"]["contents"][2]["parts"][0]["functionResponse"];
    assert_eq!(response["id"], "call_def456");
    assert_eq!(response["response"]["result"], "hello");
}

#[test]
fn test_tool_result_only_message_has_no_text_part() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "Run something"},
            {
                "role": "assistant",
                "content": [{"type": "tool_use", "id": "call_only", "name": "Shell", "input": {"command": "pwd"}}]
            },
            {
                "role": "user",
                "content": [{"type": "tool_result", "tool_use_id": "call_only", "content": "/home/user"}]
            }
        ]
    }));

    let parts = output["request"]["contents"][2]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 1);
    assert!(parts[0].get("text").is_none());
    assert_no_empty_turns(&output);
}

#[test]
fn test_multi_turn_claude_conversation() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "What files are in the current directory?"},
            {
                "role": "assistant",
                "content": [{"type": "tool_use", "id": "call_1", "name": "Shell", "input": {"command": "ls"}}]
            },
            {
                "role": "user",
                "content": [{"type": "tool_result", "tool_use_id": "call_1", "content": "a.txt\nb.txt"}]
            },
            {
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Reading a.txt."},
                    {"type": "tool_use", "id": "call_2", "name": "Read", "input": {"filePath": "a.txt"}}
                ]
            },
            {
                "role": "user",
                "content": [{"type": "tool_result", "tool_use_id": "call_2", "content": "contents"}]
            },
            {"role": "assistant", "content": "a.txt says: contents"}
        ]
    }));

    let contents = output["request"]["contents"].as_array().unwrap();
    let roles: Vec<&str> = contents.iter().map(|t| t["role"].as_str().unwrap()).collect();
    assert_eq!(roles, vec!["user", "model", "user", "model", "user", "model"]);
    assert_eq!(contents[2]["parts"][0]["functionResponse"]["name"], "Shell");
    assert_eq!(contents[4]["parts"][0]["functionResponse"]["name"], "Read");
    assert_eq!(contents[5]["parts"][0]["text"], "a.txt says: contents");
    assert_signed_calls(&output);
    assert_no_empty_turns(&output);
}

#[test]
fn test_openai_tool_calls_and_tool_message() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "Weather in Paris?"},
            {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_w",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
                }]
            },
            {"role": "tool", "tool_call_id": "call_w", "content": "{\"temp\":21}"}
        ]
    }));

    let contents = output["request"]["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);

    let call = &contents[1]["parts"][0];
    assert_eq!(call["functionCall"]["name"], "get_weather");
    assert_eq!(call["functionCall"]["args"], json!({"city": "Paris"}));
    assert_eq!(call["thoughtSignature"], THOUGHT_SIGNATURE);

    let response = &contents[2]["parts"][0]["functionResponse"];
    assert_eq!(response["id"], "call_w");
    assert_eq!(response["name"], "get_weather");
    assert_eq!(response["response"]["result"], json!({"temp": 21}));
}

#[test]
fn test_openai_call_answered_with_claude_result() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "Search"},
            {
                "role": "assistant",
                "tool_calls": [{
                    "id": "call_x",
                    "type": "function",
                    "function": {"name": "grep", "arguments": "{\"pattern\":\"todo\"}"}
                }]
            },
            {
                "role": "user",
                "content": [
                    {"type": "tool_result", "tool_use_id": "call_x", "content": "3 matches"},
                    {"type": "text", "text": "Summarize them"}
                ]
            }
        ]
    }));

    let parts = output["request"]["contents"][2]["parts"].as_array().unwrap();
    assert_eq!(parts[0]["functionResponse"]["name"], "grep");
    assert_eq!(parts[1]["text"], "Summarize them");
}

#[test]
fn test_claude_call_answered_with_tool_message() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "Where am I?"},
            {
                "role": "assistant",
                "content": [{"type": "tool_use", "id": "toolu_1", "name": "Shell", "input": {"command": "pwd"}}]
            },
            {"role": "tool", "tool_call_id": "toolu_1", "content": "/srv"}
        ]
    }));

    let response = &output["request"]["contents"][2]["parts"][0]["functionResponse"];
    assert_eq!(response["name"], "Shell");
    assert_eq!(response["response"]["result"], "/srv");
}

#[test]
fn test_tool_use_with_empty_input() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "Do something"},
            {
                "role": "assistant",
                "content": [{"type": "tool_use", "id": "call_empty", "name": "NoArgsFunction", "input": {}}]
            }
        ]
    }));

    assert_eq!(output["request"]["contents"][1]["parts"][0]["functionCall"]["args"], json!({}));
}

#[test]
fn test_multiple_tool_use_in_one_message() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "Check both disk and memory"},
            {
                "role": "assistant",
                "content": [
                    {"type": "tool_use", "id": "call_disk", "name": "Shell", "input": {"command": "df -h"}},
                    {"type": "tool_use", "id": "call_mem", "name": "Shell", "input": {"command": "free -m"}}
                ]
            }
        ]
    }));

    let parts = output["request"]["contents"][1]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["functionCall"]["id"], "call_disk");
    assert_eq!(parts[1]["functionCall"]["id"], "call_mem");
    assert_signed_calls(&output);
}

#[test]
fn test_unresolved_result_is_lenient_by_default() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": [{"type": "tool_result", "tool_use_id": "ghost", "content": "x"}]}
        ]
    }));

    let response = &output["request"]["contents"][0]["parts"][0]["functionResponse"];
    assert_eq!(response["id"], "ghost");
    assert_eq!(response["name"], "");
}

#[test]
fn test_unresolved_result_fails_under_strict_policy() {
    let body = serde_json::to_vec(&json!({
        "messages": [{"role": "tool", "tool_call_id": "ghost", "content": "x"}]
    }))
    .unwrap();

    let result = strict_translator().translate(MODEL, &body, false);
    assert!(matches!(result, Err(BridgeError::UnresolvedToolCall(id)) if id == "ghost"));
}

#[test]
fn test_system_and_developer_messages_become_system_instruction() {
    let output = translate(json!({
        "messages": [
            {"role": "system", "content": "Be terse."},
            {"role": "developer", "content": [{"type": "text", "text": "Use tools."}]},
            {"role": "user", "content": "Hi"}
        ]
    }));

    let instruction = &output["request"]["systemInstruction"];
    assert_eq!(instruction["parts"][0]["text"], "Be terse.\n\nUse tools.");
    assert_eq!(output["request"]["contents"].as_array().unwrap().len(), 1);
}

#[test]
fn test_sampling_settings_pass_through() {
    let output = translate(json!({
        "messages": [{"role": "user", "content": "Hi"}],
        "temperature": 0.2,
        "top_p": 0.9,
        "max_tokens": 100,
        "max_completion_tokens": 256,
        "stop": "END",
        "reasoning_effort": "high"
    }));

    let config = &output["request"]["generationConfig"];
    assert_eq!(config["temperature"], json!(0.2));
    assert_eq!(config["topP"], json!(0.9));
    assert_eq!(config["maxOutputTokens"], json!(256));
    assert_eq!(config["stopSequences"], json!(["END"]));
    assert_eq!(config["thinkingConfig"]["thinkingBudget"], json!(24576));
    assert_eq!(config["thinkingConfig"]["includeThoughts"], json!(true));
}

#[test]
fn test_no_generation_config_without_settings() {
    let output = translate(json!({"messages": [{"role": "user", "content": "Hi"}]}));
    assert!(output["request"].get("generationConfig").is_none());
}

#[test]
fn test_grounding_adds_search_tool() {
    let body = serde_json::to_vec(&json!({
        "messages": [{"role": "user", "content": "News?"}],
        "tools": [{"name": "read", "input_schema": {"type": "object"}}]
    }))
    .unwrap();

    let output: Value =
        serde_json::from_slice(&translator::translate(MODEL, &body, true).unwrap()).unwrap();

    let tools = output["request"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["functionDeclarations"][0]["name"], "read");
    assert_eq!(tools[1]["googleSearch"], json!({}));
}

#[test]
fn test_tools_hold_one_group_without_grounding() {
    let output = translate(json!({
        "messages": [{"role": "user", "content": "Hi"}],
        "tools": [
            {"name": "read", "input_schema": {"type": "object"}},
            {"type": "function", "function": {"name": "write", "parameters": {"type": "object"}}}
        ]
    }));

    let tools = output["request"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["functionDeclarations"].as_array().unwrap().len(), 2);
    assert!(!output.to_string().contains("googleSearch"));
}

#[test]
fn test_grounding_without_declarations() {
    let body = serde_json::to_vec(&json!({"messages": [{"role": "user", "content": "News?"}]})).unwrap();
    let output: Value =
        serde_json::from_slice(&translator::translate(MODEL, &body, true).unwrap()).unwrap();

    assert_eq!(output["request"]["tools"], json!([{"googleSearch": {}}]));
}

#[test]
fn test_model_argument_overrides_body() {
    let output = translate(json!({
        "model": "body-model",
        "messages": [{"role": "user", "content": "Hi"}]
    }));
    assert_eq!(output["model"], MODEL);
}

#[test]
fn test_malformed_body_is_rejected() {
    let bodies: [&[u8]; 3] = [b"not json", b"[1,2]", b"\"text\""];
    for body in bodies {
        let result = translator::translate(MODEL, body, false);
        assert!(matches!(result, Err(BridgeError::MalformedRequest(_))), "accepted {:?}", body);
    }
}

#[test]
fn test_badly_typed_message_fields_do_not_drop_the_request() {
    let output = translate(json!({
        "messages": [
            {"role": "user", "content": "hi"},
            {"role": "tool", "tool_call_id": 42, "content": "x"},
            {"role": null, "content": "lost"},
            7,
            {"role": "assistant", "content": "ok", "tool_calls": {"id": "not a list"}}
        ]
    }));

    let contents = output["request"]["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["parts"][0]["text"], "hi");

    let response = &contents[1]["parts"][0]["functionResponse"];
    assert_eq!(response["id"], "42");
    assert_eq!(response["response"]["result"], "x");

    assert_eq!(contents[2]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "ok");
    assert_no_empty_turns(&output);
}

#[test]
fn test_badly_typed_request_fields_count_as_absent() {
    let output = translate(json!({
        "model": ["not", "a", "model"],
        "messages": [{"role": "user", "content": "hi"}],
        "tools": {"name": "x"},
        "stop": 5,
        "reasoning_effort": {"level": "high"}
    }));

    assert_eq!(output["model"], MODEL);
    assert_eq!(output["request"]["contents"][0]["parts"][0]["text"], "hi");
    assert!(output["request"].get("tools").is_none());
    assert!(output["request"].get("generationConfig").is_none());
}

#[test]
fn test_messages_that_are_not_a_list_yield_no_turns() {
    let output = translate(json!({"messages": 5}));
    assert_eq!(output["request"]["contents"], json!([]));
}

#[test]
fn test_stop_list_keeps_only_strings() {
    let output = translate(json!({
        "messages": [{"role": "user", "content": "hi"}],
        "stop": ["END", 3, "STOP"]
    }));
    assert_eq!(output["request"]["generationConfig"]["stopSequences"], json!(["END", "STOP"]));
}

#[test]
fn test_tool_result_with_empty_content_keeps_its_turn() {
    for result in [json!({"content": ""}), json!({"content": []}), json!({})] {
        let mut block = json!({"type": "tool_result", "tool_use_id": "call_1"});
        block.as_object_mut().unwrap().extend(result.as_object().unwrap().clone());

        let output = translate(json!({
            "messages": [
                {"role": "user", "content": "Run it"},
                {
                    "role": "assistant",
                    "content": [{"type": "tool_use", "id": "call_1", "name": "Shell", "input": {}}]
                },
                {"role": "user", "content": [block]}
            ]
        }));

        let contents = output["request"]["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3, "variant {}", result);
        assert_eq!(contents[2]["role"], "user");

        let parts = contents[2]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1, "variant {}", result);
        assert_eq!(parts[0]["functionResponse"]["name"], "Shell");
        assert_eq!(parts[0]["functionResponse"]["response"]["result"], "", "variant {}", result);
        assert_no_empty_turns(&output);
    }
}

#[test]
fn test_inline_images_from_both_formats() {
    let output = translate(json!({
        "messages": [{
            "role": "user",
            "content": [
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
                {"type": "image", "source": {"type": "base64", "media_type": "image/jpeg", "data": "BBBB"}},
                {"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}}
            ]
        }]
    }));

    let parts = output["request"]["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[1]["inlineData"]["data"], "BBBB");
}
