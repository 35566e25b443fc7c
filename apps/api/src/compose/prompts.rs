//! Prompt constants for the compose operations. Templates use `{placeholder}`
//! slots filled with `str::replace`.

pub const TYPESET_SYSTEM: &str = "You are a typesetting assistant for long-form social cards. \
You re-flow text for card layout without ever altering its content.";

pub const TYPESET_TEMPLATE: &str = r#"Re-flow the text below for card layout.

Rules:
- Break lines at sentence boundaries so each sentence stands alone.
- You may mark at most one line as a quote with a leading "> ".
- You may wrap the most emotionally resonant short sentences in ==double equals== highlight pairs.
- NEVER add, remove, reorder, or change any character of the original content. Only line breaks and the markers above may differ.
- Return the re-flowed text only, with no commentary.

Text:
{text}"#;

pub const REPAIR_SYSTEM: &str = "You are a typesetting assistant. Your previous attempt changed the \
content of the text, which is forbidden. Markers and line breaks only.";

pub const REPAIR_TEMPLATE: &str = r#"Your previous re-flow altered the original characters. Produce a new re-flow of the ORIGINAL text below. Copy every character exactly; you may only insert line breaks, "> " quote markers, and ==highlight== pairs.

Original text:
{text}

Your rejected attempt (do NOT repeat its content changes):
{attempt}"#;

pub const COVER_SYSTEM: &str = "You are an art director for long-form social posts. \
You answer with a single JSON object and nothing else.";

pub const COVER_TEMPLATE: &str = r#"Read the article excerpt below and design its cover.

Respond with JSON of this exact shape:
{"title": "...", "abstract": "...", "image_prompt": "..."}

- "title": a cover title of at most 20 characters, in the article's language.
- "abstract": a one- or two-sentence hook, at most 60 characters.
- "image_prompt": an English prompt for an illustration matching the article's mood. No text or letters in the image.
- Creative direction: {direction}

Article excerpt:
{content}"#;
