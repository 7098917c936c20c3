//! Parser for one step of a ReAct trace.

use regex::Regex;
use std::sync::OnceLock;

pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

pub const MISSING_ACTION_AFTER_THOUGHT: &str = "Invalid Format: Missing 'Action:' after 'Thought:'";
pub const MISSING_ACTION_INPUT_AFTER_ACTION: &str =
    "Invalid Format: Missing 'Action Input:' after 'Action:'";
pub const FINAL_ANSWER_AND_ACTION: &str =
    "Invalid Format: Parsing LLM output produced both a final answer and a parse-able action";

/// A parsed model turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactStep {
    Action { tool: String, input: String, log: String },
    Finish { output: String, log: String },
}

/// A step that does not follow the grammar. `observation` is fed back to the
/// model so it can correct itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub observation: &'static str,
    pub raw: String,
}

fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
            .expect("valid action regex")
    })
}

fn action_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Action\s*\d*\s*:").expect("valid action marker regex"))
}

fn action_input_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Action\s*\d*\s*Input\s*\d*\s*:").expect("valid action input regex")
    })
}

/// Parse `text` into an action or a final answer.
///
/// An action wins over a final answer only when no final answer is present;
/// both together is malformed.
pub fn parse_step(text: &str) -> Result<ReactStep, ParseFailure> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = action_regex().captures(text) {
        if includes_answer {
            return Err(ParseFailure { observation: FINAL_ANSWER_AND_ACTION, raw: text.to_string() });
        }
        let tool = caps[1].trim().to_string();
        let input = caps[2].trim().trim_matches('"').to_string();
        return Ok(ReactStep::Action { tool, input, log: text.to_string() });
    }

    if includes_answer {
        let output = text.rsplit(FINAL_ANSWER_MARKER).next().unwrap_or_default().trim().to_string();
        return Ok(ReactStep::Finish { output, log: text.to_string() });
    }

    let observation = if !action_only_regex().is_match(text) {
        MISSING_ACTION_AFTER_THOUGHT
    } else if !action_input_regex().is_match(text) {
        MISSING_ACTION_INPUT_AFTER_ACTION
    } else {
        "Invalid Format: Could not parse LLM output"
    };
    Err(ParseFailure { observation, raw: text.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_action() {
        let text = "Thought: I need the id\nAction: extract_order_id\nAction Input: \"pesanan 12345\"";
        match parse_step(text).unwrap() {
            ReactStep::Action { tool, input, log } => {
                assert_eq!(tool, "extract_order_id");
                assert_eq!(input, "pesanan 12345");
                assert_eq!(log, text);
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_json_input_kept_verbatim() {
        let text = "Thought: recall\nAction: retrieve_memory\nAction Input: {\"query\": \"size\"}\n";
        let ReactStep::Action { input, .. } = parse_step(text).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(input, "{\"query\": \"size\"}");
    }

    #[test]
    fn test_parse_final_answer() {
        let text = "Thought: I now know the final answer\nFinal Answer: Pesanan Anda sedang dikirim.";
        assert_eq!(
            parse_step(text).unwrap(),
            ReactStep::Finish {
                output: "Pesanan Anda sedang dikirim.".into(),
                log: text.into()
            }
        );
    }

    #[test]
    fn test_final_answer_takes_last_marker() {
        let text = "Final Answer: draft\nFinal Answer: real";
        let ReactStep::Finish { output, .. } = parse_step(text).unwrap() else {
            panic!("expected finish");
        };
        assert_eq!(output, "real");
    }

    #[test]
    fn test_action_with_final_answer_is_malformed() {
        let text = "Action: search_products\nAction Input: shoes\nFinal Answer: here";
        assert_eq!(parse_step(text).unwrap_err().observation, FINAL_ANSWER_AND_ACTION);
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(parse_step("I think the answer is 42").unwrap_err().observation, MISSING_ACTION_AFTER_THOUGHT);
        assert_eq!(
            parse_step("Thought: look up\nAction: get_order_status").unwrap_err().observation,
            MISSING_ACTION_INPUT_AFTER_ACTION
        );
    }

    proptest! {
        #[test]
        fn prop_never_panics(text in ".{0,200}") {
            let _ = parse_step(&text);
        }

        #[test]
        fn prop_plain_text_without_markers_fails(text in "[a-z ]{0,80}") {
            prop_assert!(parse_step(&text).is_err());
        }
    }
}
