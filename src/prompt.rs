//! The instruction template sent to the model for every question.

/// Fixed quiz-question template.
///
/// `{topic}` and `{context}` are substituted by [`render_quiz_prompt`].
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"You are a subject matter expert on the topic: {topic}

Follow the instructions to create a quiz question:
1. Generate a question based on the topic provided and context as key "question"
2. Provide 4 multiple choice answers to the question as a list of key-value pairs "choices"
3. Provide the correct answer for the question from the list of answers as key "answer"
4. Provide an explanation as to why the answer is correct as key "explanation"

You must respond as a JSON object with the following structure:
{
    "question": "<question>",
    "choices": [
        {"key": "A", "value": "<choice>"},
        {"key": "B", "value": "<choice>"},
        {"key": "C", "value": "<choice>"},
        {"key": "D", "value": "<choice>"}
    ],
    "answer": "<answer key from choices list>",
    "explanation": "<explanation as to why the answer is correct>"
}

Context: {context}
"#;

/// Fill the template. Substitution happens in one pass over the template, so
/// braces or placeholder names inside `topic` or `context` are left alone.
pub fn render_quiz_prompt(topic: &str, context: &str) -> String {
    let mut out = String::with_capacity(QUIZ_PROMPT_TEMPLATE.len() + topic.len() + context.len());
    let mut rest = QUIZ_PROMPT_TEMPLATE;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{topic}") {
            out.push_str(topic);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{context}") {
            out.push_str(context);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Passage texts joined with a single space.
pub fn join_context<'a, I>(passages: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    passages.into_iter().collect::<Vec<_>>().join(" ")
}
