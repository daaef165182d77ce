// Shared prompt fragments and prompt-building utilities.
// Each AI operation defines its own template in ai/prompts.rs.

/// Sentence appended to every system prompt so the model answers with JSON only.
pub const JSON_ONLY_SUFFIX: &str = "Always respond in valid JSON format. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Builds a system prompt from a persona description plus the JSON-only rule.
pub fn system_prompt(persona: &str) -> String {
    format!("{} {}", persona.trim_end(), JSON_ONLY_SUFFIX)
}

/// Substitutes `{name}` placeholders in a prompt template.
/// Placeholders with no matching variable (including literal JSON braces in the
/// schema examples) are left untouched. Substituted values are never rescanned.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(close) = rest.find('}') {
        // innermost brace pair only, so JSON examples never swallow a placeholder
        let Some(open) = rest[..close].rfind('{') else {
            out.push_str(&rest[..=close]);
            rest = &rest[close + 1..];
            continue;
        };
        out.push_str(&rest[..open]);
        let name = &rest[open + 1..close];
        match vars.iter().find(|(n, _)| *n == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..=close]),
        }
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Renders an optional labelled line, or nothing when the value is absent or blank.
pub fn optional_line(label: &str, value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => format!("{label}: {v}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_appends_json_rule() {
        let prompt = system_prompt("You are an expert recruiter. ");
        assert!(prompt.starts_with("You are an expert recruiter. Always respond"));
    }

    #[test]
    fn test_fill_template_replaces_all_occurrences() {
        let out = fill_template("{a} and {a} but {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x but y");
    }

    #[test]
    fn test_fill_template_leaves_unknown_placeholders() {
        let out = fill_template("{known} {unknown}", &[("known", "ok")]);
        assert_eq!(out, "ok {unknown}");
    }

    #[test]
    fn test_fill_template_keeps_json_schema_braces() {
        let template = "Resume:\n{resume}\n\n{\n  \"score\": <number>,\n  \"items\": [{\"a\": 1}]\n}";
        let out = fill_template(template, &[("resume", "text")]);
        assert_eq!(
            out,
            "Resume:\ntext\n\n{\n  \"score\": <number>,\n  \"items\": [{\"a\": 1}]\n}"
        );
    }

    #[test]
    fn test_fill_template_placeholder_nested_in_json() {
        let out = fill_template("{\"k\": \"{v}\"}", &[("v", "1")]);
        assert_eq!(out, "{\"k\": \"1\"}");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("{a} {b}", &[("a", "{b}"), ("b", "y")]);
        assert_eq!(out, "{b} y");
    }

    #[test]
    fn test_optional_line() {
        assert_eq!(optional_line("Notes", Some("remote ok")), "Notes: remote ok");
        assert_eq!(optional_line("Notes", Some("  ")), "");
        assert_eq!(optional_line("Notes", None), "");
    }
}
