use crate::llm::gateway::GenerationGateway;

/// Customer-facing reply, 2-3 sentences. The tone split on the rating is a
/// prompt instruction; the pipeline does not branch on it.
pub async fn generate_user_response(
    gateway: &GenerationGateway,
    rating: i32,
    review_text: &str,
) -> String {
    gateway
        .generate(&user_response_prompt(rating, review_text))
        .await
}

/// 1-2 sentence condensation of the review.
pub async fn generate_summary(
    gateway: &GenerationGateway,
    rating: i32,
    review_text: &str,
) -> String {
    gateway.generate(&summary_prompt(rating, review_text)).await
}

/// 2-3 bullet-style concrete actions for management.
pub async fn generate_recommended_actions(
    gateway: &GenerationGateway,
    rating: i32,
    review_text: &str,
) -> String {
    gateway.generate(&actions_prompt(rating, review_text)).await
}

fn user_response_prompt(rating: i32, review_text: &str) -> String {
    format!(
        "You are a friendly customer service representative. A customer has submitted a {rating}-star review:\n\n\
\"{review_text}\"\n\n\
Generate a warm, professional, and personalized response (2-3 sentences) that:\n\
- Acknowledges their feedback\n\
- Shows appreciation for their input\n\
- If rating is 3 or below, expresses commitment to improvement\n\
- If rating is 4 or 5, thanks them for their positive feedback\n\n\
Keep it concise and genuine."
    )
}

fn summary_prompt(rating: i32, review_text: &str) -> String {
    format!(
        "Summarize this {rating}-star restaurant review in 1-2 sentences:\n\n\
\"{review_text}\"\n\n\
Provide a concise summary highlighting the key points."
    )
}

fn actions_prompt(rating: i32, review_text: &str) -> String {
    format!(
        "Based on this {rating}-star restaurant review, suggest 2-3 specific recommended actions for the restaurant management:\n\n\
Review: \"{review_text}\"\n\n\
Provide actionable recommendations in a bullet-point format. Focus on concrete steps the restaurant can take."
    )
}
