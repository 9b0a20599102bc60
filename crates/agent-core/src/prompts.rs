//! Prompt Templates
//!
//! Every prompt the pipeline sends to the model is built here. Builders are
//! pure functions of their inputs so identical requests produce identical
//! prompts.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::intent::IntentDefinition;
use crate::tool::ToolRegistry;

/// Intent name that gets the small-talk template
pub const GREETING_INTENT: &str = "greeting";

/// Intent name for requests no agent can serve
pub const OUT_OF_SCOPE_INTENT: &str = "out_of_scope";

/// Single-quoted samples inside a parameter description, e.g. `'5 + 3'`
static QUOTED_SAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']+)'").expect("static regex"));

const CLASSIFICATION_EXAMPLES: &str = r#"Examples:
User: "Hello there"
{
"intent": "greeting",
"confidence": 0.95,
"entities": {},
"reasoning": "User is greeting"
}

User: "Calculate 5 + 3"
{
"intent": "calculate",
"confidence": 0.98,
"entities": { "expression": "5 + 3" },
"reasoning": "User wants to perform addition"
}

User: "What is the weather in London?"
{
"intent": "out_of_scope",
"confidence": 0.90,
"entities": { "location": "London" },
"reasoning": "Weather information is not supported"
}"#;

const CAPABILITIES: &str = "I can help with:
- Greetings and friendly conversation
- Mathematical calculations (basic and advanced)";

/// Prompt asking the model to map `user_input` onto one registered intent
pub fn intent_classification(definitions: &[IntentDefinition], user_input: &str) -> String {
    let intent_list = definitions
        .iter()
        .map(|d| format!("- {}: {}", d.name, d.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an intent classifier for a multi-agent chatbot system.

Available Intents:
{intent_list}

{CLASSIFICATION_EXAMPLES}

Current User Input: "{user_input}"

Task: Classify the user's intent based on their current input.
Output ONLY valid JSON with the keys "intent", "confidence", "entities" and "reasoning", matching the examples above.

JSON Response:"#
    )
}

/// Prompt asking the model to choose one tool and extract its input
pub fn tool_selection(user_input: &str, tools: &ToolRegistry) -> String {
    let mut tools_text = String::new();
    let mut examples = Vec::new();

    for tool in tools.iter() {
        let _ = writeln!(tools_text, "  - {}: {}", tool.name(), tool.description());
        for param in tool.parameters() {
            let _ = writeln!(tools_text, "      * {}: {}", param.name, param.description);
        }

        if let Some(input) = tool.parameter("input") {
            for sample in QUOTED_SAMPLE.captures_iter(input) {
                let sample = &sample[1];
                examples.push(format!(
                    "User: \"...{sample}...\"\n{{\"tool_name\": \"{name}\", \"entities\": {{\"input\": \"{sample}\"}}, \"reasoning\": \"Use {name} tool\"}}",
                    name = tool.name(),
                ));
            }
        }
    }

    let examples_text = if examples.is_empty() {
        "No examples available.".to_string()
    } else {
        examples.join("\n\n")
    };

    format!(
        r#"You are a tool selector. Choose the right tool for the user's request.

Available tools:
{tools_text}
Examples of correct tool selection:
{examples_text}

CRITICAL INSTRUCTIONS:
1. Match the user's request to the most appropriate tool based on the tool descriptions
2. Extract the expression or operation EXACTLY from the user's input
3. Put the extracted expression in the "input" field inside "entities"
4. Return ONLY valid JSON in this exact format: {{"tool_name": "SELECTED_TOOL", "entities": {{"input": "EXTRACTED_EXPRESSION"}}, "reasoning": "Brief explanation"}}

Current user request: "{user_input}"

Analyze the request and select the appropriate tool. Return ONLY the JSON:

JSON:"#
    )
}

/// Prompt asking the model to phrase a tool result as an answer
pub fn tool_response(user_input: &str, tool_result: &str) -> String {
    format!(
        r#"You are a helpful AI assistant. Answer the user's question using the tool result.

User: {user_input}

Tool Result:
{tool_result}

Instructions:
- Use the tool result to answer the user's question
- Provide a clear, direct answer based on the result
- Be concise (1-2 sentences)
- Do NOT mention "the tool" - just give the answer naturally

Your response:"#
    )
}

/// Prompt for replies that need no tool
pub fn conversational_response(user_input: &str, intent: &str) -> String {
    match intent {
        GREETING_INTENT => format!(
            r#"You are a friendly AI assistant.
User: {user_input}

Instructions:
- Respond warmly and naturally to the user's greeting or small talk.
- Keep the reply concise (1-2 sentences).
- Write only what the assistant would say, with no analysis or meta-commentary.

Assistant:"#
        ),
        OUT_OF_SCOPE_INTENT => format!(
            r#"You are a helpful AI assistant with limited but useful capabilities.

User: {user_input}

Capabilities:
{CAPABILITIES}

Instructions:
- Politely explain that you cannot complete their specific request.
- Offer what you CAN help with instead.
- Stay friendly and concise (2-3 sentences).
- Write only the assistant's reply, no additional commentary.

Assistant:"#
        ),
        _ => format!(
            r#"You are a helpful AI assistant.

User: {user_input}

Instructions:
- Respond naturally and helpfully to the user.
- Keep the reply concise (1-2 sentences).
- Output only the assistant's message, without analysis.

Assistant:"#
        ),
    }
}
