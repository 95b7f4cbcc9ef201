//! # Markdown Rendering
//!
//! Turns tutorial markdown into a renderable [`Node`] tree.
//!
//! ## Pipeline
//!
//! 1. Container directives (`:::info` ... `:::`) are split out and their
//!    bodies rendered recursively; `info`, `warning` and `important` become
//!    alert boxes, any other name a plain block
//! 2. Markdown segments are parsed with GFM tables, strikethrough, task
//!    lists and footnotes; soft breaks are kept as line breaks
//! 3. Links become [`ExternalLink`]s (new context, no referrer)
//! 4. Image sources get the deployment prefix from [`RenderOptions`]
//! 5. Code fences annotated `language[:filename]` are highlighted when the
//!    language is registered, with a filename header and copy action
//!
//! ## Fence Annotation
//!
//! | Info string | Result |
//! |-------------|--------|
//! | `ts:app.ts` | Highlighted, header "app.ts" with copy control |
//! | `bash` | Highlighted, no header |
//! | `cobol` or empty | Plain code, no header |

pub mod code;
pub mod directive;
pub mod highlight;
pub mod node;
mod renderer;

pub use code::{Clipboard, CodeBlock, CodeHeader, CopyAction, Notification, Notifier, ToastPosition, COPIED_MESSAGE};
pub use directive::{Directive, DirectiveKind};
pub use highlight::{Language, Rgb, Span, Theme, TokenKind};
pub use node::{walk, Align, AlertKind, ExternalLink, HighlightedCode, Image, Node};
pub use renderer::{MarkdownRenderer, RenderOptions};
