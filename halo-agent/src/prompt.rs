//! ReAct prompt rendering.

use halo_core::Tool;
use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock};

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"))
}

const REACT_TEMPLATE: &str = "{instructions}

You have access to the following tools:
{tools}

Tool names for reference:
{tool_names}

CRITICAL FORMATTING RULES:
- You MUST follow the EXACT format below
- Use EXACTLY one tool per Action step
- If you output an Action, DO NOT output Final Answer in the same step
- AFTER an Action, WAIT for an Observation before continuing
- Only output Final Answer when you have enough information and no further Action is needed
- NEVER combine multiple actions in one step
- ALWAYS use the exact format with proper line breaks
- NEVER use commas in Action Input - use separate lines

REQUIRED FORMAT:
Question: {input}
Thought: you should always think about what to do
Action: the tool to use, should be one of [{tool_names}]
Action Input: the input to the tool

Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!
{agent_scratchpad}";

/// One line per tool, `name: description`.
pub fn render_tools(tools: &[Arc<dyn Tool>]) -> String {
    tools.iter().map(|t| format!("{}: {}", t.name(), t.description())).collect::<Vec<_>>().join("\n")
}

pub fn tool_names(tools: &[Arc<dyn Tool>]) -> String {
    tools.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
}

/// Full prompt for one reasoning step.
pub fn render_react_prompt(
    instructions: &str,
    tools: &[Arc<dyn Tool>],
    input: &str,
    scratchpad: &str,
) -> String {
    let names = tool_names(tools);
    let descriptions = render_tools(tools);
    // Single pass, so braces inside substituted text are never expanded.
    placeholder_regex()
        .replace_all(REACT_TEMPLATE, |caps: &Captures<'_>| match &caps[1] {
            "instructions" => instructions.to_string(),
            "tools" => descriptions.clone(),
            "tool_names" => names.clone(),
            "input" => input.to_string(),
            "agent_scratchpad" => scratchpad.to_string(),
            other => format!("{{{other}}}"),
        })
        .into_owned()
}
