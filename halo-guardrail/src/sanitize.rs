/// Character cap for text handed to an agent.
pub const MAX_AGENT_INPUT_CHARS: usize = 1000;

/// Collapse whitespace runs to single spaces and cap the length, appending
/// `...` when truncated.
pub fn sanitize_agent_input(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_AGENT_INPUT_CHARS {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(MAX_AGENT_INPUT_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/// True when `output` looks like a complete reasoning trace: it carries
/// `Question:`, `Thought:` and `Final Answer:` markers, each at the start of a line.
pub fn is_react_trace(output: &str) -> bool {
    if output.is_empty() {
        return false;
    }
    ["Question:", "Thought:", "Final Answer:"].iter().all(|marker| {
        output.lines().any(|line| line.trim_start().starts_with(marker))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize_agent_input("  where\n\n is   my\torder "), "where is my order");
        assert_eq!(sanitize_agent_input(""), "");
    }

    #[test]
    fn test_truncates_long_input() {
        let long = "a".repeat(1500);
        let out = sanitize_agent_input(&long);
        assert_eq!(out.chars().count(), MAX_AGENT_INPUT_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncation_is_char_safe() {
        let long = "é".repeat(1200);
        assert_eq!(sanitize_agent_input(&long).chars().count(), 1003);
    }

    #[test]
    fn test_react_trace_detection() {
        let trace = "Question: hi\nThought: greet\nFinal Answer: Halo!";
        assert!(is_react_trace(trace));
        assert!(!is_react_trace("Final Answer: Halo!"));
        assert!(!is_react_trace(""));
    }
}
