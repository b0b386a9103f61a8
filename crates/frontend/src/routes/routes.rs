use crate::domain::a001_qa_chat::ui::details::ChatDashboard;
use crate::system::auth::context::use_session;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;

#[component]
pub fn AppRoutes() -> impl IntoView {
    let session = use_session();

    view! {
        <Show
            when=move || session.authenticated.get()
            fallback=|| view! { <LoginPage /> }
        >
            <ChatDashboard />
        </Show>
    }
}
