//! Fixed prompt templates for the advisory endpoints

use crate::store::Document;

/// System instruction sent with every advice request
pub const ADVICE_SYSTEM_PROMPT: &str =
    "You are Gullak AI, a friendly finance and investment assistant.";

/// System instruction for the influencer list
pub const INFLUENCER_SYSTEM_PROMPT: &str =
    "You are a helpful AI giving JSON lists of influencers.";

/// User prompt for the influencer list
pub const INFLUENCER_PROMPT: &str = r#"Provide a list of 6 Indian finance/social media influencers.
Include: name, topic, platform (YouTube/Instagram), and link.
Return as a JSON array:
[{"name": "...", "topic": "...", "platform": "...", "link": "..."}]"#;

/// Everything the advice template embeds
#[derive(Debug, Clone, Copy)]
pub struct AdviceContext<'a> {
    pub query: &'a str,
    pub user_id: Option<&'a str>,
    pub user_name: Option<&'a str>,
    pub expenses: &'a [Document],
    pub investments: &'a [Document],
}

/// Render the advice prompt
///
/// Records are embedded as raw JSON dumps; an anonymous caller gets empty
/// lists and `unknown` as user id.
pub fn build_advice_prompt(ctx: &AdviceContext<'_>) -> String {
    let name_line = ctx
        .user_name
        .map(|name| format!("User Name: {}\n", name))
        .unwrap_or_default();

    format!(
        r#"You are Gullak, an Indian AI money mentor and portfolio assistant.

Style:
- Speak naturally like a friendly human in English or Hinglish, matching the query
- Use emojis where appropriate
- Keep the response within 5-8 sentences
- Avoid generic greetings like "Namaste Guest"
- Give short, actionable, realistic financial guidance
- Stay grounded in the user's data and query

User Query: {query}
User ID: {user_id}
{name_line}User Expenses Summary: {expenses}
User Investments Summary: {investments}

Task:
- Analyze the query and respond intelligently.
- If the question is about investment, give portfolio tips.
- If the question is about saving, give saving ideas.
- If the question is about budget, give personalized budgeting help.
- If the question is vague, politely ask for clarification.

The answer should feel human, practical, and warm."#,
        query = ctx.query,
        user_id = ctx.user_id.unwrap_or("unknown"),
        name_line = name_line,
        expenses = dump_records(ctx.expenses),
        investments = dump_records(ctx.investments),
    )
}

fn dump_records(docs: &[Document]) -> String {
    serde_json::to_string(docs).unwrap_or_else(|_| "[]".to_string())
}
