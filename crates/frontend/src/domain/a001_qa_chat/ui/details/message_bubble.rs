//! One transcript entry
//!
//! Confidence policy: every answer that carries a score shows a
//! `Confidence: N%` footer; scores below the threshold get the warning color.

use chrono::Local;
use contracts::domain::a001_qa_chat::aggregate::{ChatMessage, ConfidenceLevel};
use leptos::prelude::*;

/// `42` -> "42%", `87.26` -> "87.3%"
pub fn format_confidence(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}%", score)
    } else {
        format!("{:.1}%", score)
    }
}

fn text_color(level: Option<ConfidenceLevel>) -> &'static str {
    match level {
        Some(ConfidenceLevel::Low) => "color: var(--color-error, red);",
        _ => "color: inherit;",
    }
}

#[component]
pub fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let is_user = message.is_user();
    let level = message.confidence_level();
    let time = message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    let footer = message
        .confidence
        .map(|c| format!("Confidence: {}", format_confidence(c)));

    view! {
        <div
            style=if is_user {
                "align-self: flex-end; max-width: 70%;"
            } else {
                "align-self: flex-start; max-width: 70%;"
            }
        >
            <div
                style=if is_user {
                    "background: var(--colorBrandBackground2); padding: 10px 14px; border-radius: 12px; text-align: right;"
                } else {
                    "background: transparent; padding: 10px 14px; border-radius: 12px; text-align: left;"
                }
            >
                <div style=format!("white-space: pre-wrap; word-break: break-word; {}", text_color(level))>
                    {message.text}
                </div>
                <div style="font-size: 11px; opacity: 0.7; margin-top: 6px;">
                    {time}
                    {footer.map(|f| format!(" • {}", f))}
                </div>
            </div>
        </div>
    }
}
