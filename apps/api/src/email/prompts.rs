// LLM prompt constants for the email assembly module.
// Composed with the JSON-only fragment from llm_client::prompts at call time.

/// Role half of the system prompt for email section generation.
pub const EMAIL_SYSTEM_ROLE: &str =
    "You are an experienced freelance consultant writing a personalized \
    outreach email to a potential client. \
    Do NOT invent achievements, metrics, or facts not present in the input.";

/// Email generation prompt template.
/// Replace: {sender_json}, {project_json}, {analysis_json}, {achievement_json},
///          {tone}
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"Write a personalized outreach email for the lead below.

SENDER (source of truth for all claims):
{sender_json}

LEAD:
{project_json}

DETECTED NEEDS AND PAIN POINTS:
{analysis_json}

MOST RELEVANT PAST ACHIEVEMENT (may be null — then make no achievement claims):
{achievement_json}

Tone: {tone}

Return a JSON object with this EXACT schema (no extra fields):
{
  "subject_lines": ["...", "...", "..."],
  "opening": "...",
  "value_proposition": "...",
  "social_proof": "...",
  "call_to_action": "..."
}

HARD RULES:
1. `subject_lines` must contain EXACTLY 3 entries
2. Reference only facts from SENDER and the achievement — no invention
3. `social_proof` must be the empty string "" unless the achievement carries a benchmark
4. 120-180 words across opening + value_proposition + call_to_action
5. No placeholder tokens, no brace characters, never the literal words "null" or "undefined"
6. Mention the lead title and platform naturally in the opening"#;
