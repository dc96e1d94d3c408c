//! Rewrite instruction composition.

use retouch_protocols::ElementSnapshot;

/// Compose the natural-language rewrite instruction sent to the
/// mediator: the original markup, the visible text, and the user's
/// request, with the reply format pinned to a bare fragment.
pub fn compose_rewrite_instruction(snapshot: &ElementSnapshot) -> String {
    let instruction = snapshot.user_instruction.as_deref().unwrap_or("");
    format!(
        "You are editing one element of a live web page.\n\n\
         Current element markup:\n{markup}\n\n\
         Visible text: \"{text}\"\n\n\
         User request: {instruction}\n\n\
         Rewrite the element to satisfy the request. Respond with ONLY \
         the replacement HTML fragment for this element. No explanation, \
         no code fences, no surrounding document.",
        markup = snapshot.markup,
        text = snapshot.text,
    )
}
