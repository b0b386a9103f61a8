//! Chat dashboard - view component

use super::message_bubble::{format_confidence, MessageBubble};
use super::view_model::ChatDashboardVm;
use crate::shared::icons::icon;
use crate::system::auth::context::use_session;
use contracts::domain::a001_qa_chat::aggregate::ConfidenceLevel;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn ChatDashboard() -> impl IntoView {
    let vm = ChatDashboardVm::new();
    let session = use_session();
    let messages_container_ref = NodeRef::<leptos::html::Div>::new();

    // Scroll to bottom helper
    let scroll_to_bottom = move || {
        if let Some(container) = messages_container_ref.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    };

    // Every transcript change scrolls to the newest message
    Effect::new(move |_| {
        session.messages.track();
        scroll_to_bottom();
    });

    let handle_send = Callback::new(move |_: ()| {
        let text = vm.draft.get_untracked();
        let controller = session.controller();

        // Rejections raise an alert from the controller and keep the draft
        if let Ok(pending) = controller.prepare_question(&text) {
            vm.draft.set(String::new());
            spawn_local(async move {
                controller.resolve_question(pending).await;
            });
        }
    });

    let on_file_change = move |ev: web_sys::Event| {
        use wasm_bindgen::JsCast;
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let file = input.files().and_then(|files| files.get(0));
        // Clear input so the same file can be picked again
        input.set_value("");

        if let Some(file) = file {
            let controller = session.controller();
            vm.is_uploading.set(true);
            spawn_local(async move {
                controller.upload_document(file).await;
                // The dashboard may already be gone after a logout
                let _ = vm.is_uploading.try_set(false);
            });
        }
    };

    let open_file_picker = move |_: leptos::ev::MouseEvent| {
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                if let Some(input) = document.get_element_by_id("file-input") {
                    use wasm_bindgen::JsCast;
                    if let Ok(input) = input.dyn_into::<web_sys::HtmlElement>() {
                        input.click();
                    }
                }
            }
        }
    };

    view! {
        <div style="height: 100vh; display: flex; justify-content: center; padding: 20px 0; background: var(--colorNeutralBackground2);">
            <div style="width: 100%; max-width: 760px; display: flex; flex-direction: column; background: var(--colorNeutralBackground1); border-radius: 8px; overflow: hidden;">
                // Header
                <Flex
                    justify=FlexJustify::SpaceBetween
                    align=FlexAlign::Center
                    style="padding: 16px; border-bottom: 1px solid var(--colorNeutralStroke2);"
                >
                    <h2 style="font-size: 18px; font-weight: bold;">"MasterBot"</h2>
                    <Flex align=FlexAlign::Center style="gap: 16px;">
                        <span style="color: var(--colorNeutralForeground3); font-size: 14px;">
                            {move || {
                                if session.document_uploaded.get() {
                                    "Document ready"
                                } else {
                                    "Upload a PDF to start"
                                }
                            }}
                        </span>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| session.controller().logout()
                        >
                            {icon("logout")}
                            " Logout"
                        </Button>
                    </Flex>
                </Flex>

                // Messages area
                <div
                    node_ref=messages_container_ref
                    style="flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 12px; padding: 16px;"
                >
                    <For
                        each=move || session.messages.get()
                        key=|msg| msg.id
                        let:msg
                    >
                        <MessageBubble message=msg />
                    </For>
                </div>

                // Latest answer confidence
                {move || {
                    session
                        .latest_confidence
                        .get()
                        .map(|c| {
                            let color = match ConfidenceLevel::from_score(c) {
                                ConfidenceLevel::Low => "color: var(--color-error, red);",
                                ConfidenceLevel::High => "color: var(--colorNeutralForeground3);",
                            };
                            view! {
                                <div style=format!("padding: 8px 16px; text-align: center; font-size: 13px; {}", color)>
                                    {format!("Confidence: {}", format_confidence(c))}
                                </div>
                            }
                        })
                }}

                // Input area
                <form
                    style="display: flex; gap: 8px; padding: 16px; border-top: 1px solid var(--colorNeutralStroke2);"
                    on:submit=move |ev: leptos::ev::SubmitEvent| {
                        ev.prevent_default();
                        handle_send.run(());
                    }
                >
                    <input
                        type="file"
                        accept=".pdf,application/pdf"
                        style="display: none;"
                        id="file-input"
                        on:change=on_file_change
                    />

                    <div style="flex: 1;">
                        <Input
                            value=vm.draft
                            placeholder="Type a message..."
                            attr:style="width: 100%;"
                        />
                    </div>

                    <button
                        type="button"
                        class="btn-secondary"
                        title="Upload PDF"
                        disabled=move || vm.is_uploading.get()
                        on:click=open_file_picker
                    >
                        {icon("upload")}
                    </button>

                    <button type="submit" class="btn-primary">
                        {icon("send")}
                    </button>
                </form>
            </div>
        </div>
    }
}
