use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use uuid::Uuid;
use webmail_types::{Email, NewEmail};

mod api;
mod format;

use api::ApiClient;

const SEARCH_DEBOUNCE_MS: u32 = 500;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Webmail" }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}

/// Signals backing the list and reading panes.
#[derive(Clone, Copy)]
struct Inbox {
    emails: Signal<Vec<Email>>,
    selected: Signal<Option<Email>>,
    /// Bumped by every refresh; only the latest one may touch `emails`.
    generation: Signal<u64>,
    loading: Signal<bool>,
    error: Signal<Option<String>>,
}

fn use_inbox() -> Inbox {
    Inbox {
        emails: use_signal(Vec::new),
        selected: use_signal(|| None),
        generation: use_signal(|| 0),
        loading: use_signal(|| true),
        error: use_signal(|| None),
    }
}

impl Inbox {
    fn is_current(&self, ticket: u64) -> bool {
        *self.generation.peek() == ticket
    }

    /// Reloads the list for `query`, optionally after a quiet period. A
    /// refresh started later supersedes this one, whether it is still waiting
    /// or already in flight.
    fn refresh(mut self, query: String, debounce_ms: Option<u32>) {
        let ticket = *self.generation.peek() + 1;
        self.generation.set(ticket);

        spawn(async move {
            if let Some(ms) = debounce_ms {
                TimeoutFuture::new(ms).await;
                if !self.is_current(ticket) {
                    return;
                }
            }

            self.loading.set(true);
            let client = ApiClient::new();
            let query = query.trim();
            let result = if query.is_empty() {
                client.list_emails().await
            } else {
                client.search_emails(query).await
            };

            if !self.is_current(ticket) {
                return;
            }
            match result {
                Ok(emails) => {
                    self.error.set(None);
                    self.emails.set(emails);
                }
                Err(e) => {
                    self.error.set(Some(format!("Failed to load emails: {e}")));
                }
            }
            self.loading.set(false);
        });
    }

    fn open(mut self, email: Email) {
        let id = email.id;
        self.selected.set(Some(email));

        spawn(async move {
            match ApiClient::new().get_email(id).await {
                Ok(email) => {
                    let still_open = self.is_selected(id);
                    if still_open {
                        self.selected.set(Some(email));
                    }
                }
                Err(e) => {
                    self.error.set(Some(format!("Failed to load email: {e}")));
                }
            }
        });
    }

    fn is_selected(&self, id: Uuid) -> bool {
        self.selected
            .peek()
            .as_ref()
            .is_some_and(|email| email.id == id)
    }

    fn prepend(mut self, email: Email) {
        self.emails.write().insert(0, email);
    }
}

/// Home page
#[component]
fn Home() -> Element {
    let inbox = use_inbox();
    let mut query = use_signal(String::new);
    let mut composing = use_signal(|| false);

    use_effect(move || {
        inbox.refresh(String::new(), None);
    });

    let selected_id = inbox.selected.read().as_ref().map(|email| email.id);

    rsx! {
        div {
            class: "app",
            div {
                class: "sidebar",
                div {
                    class: "search",
                    input {
                        r#type: "search",
                        placeholder: "Search emails...",
                        value: "{query}",
                        oninput: move |evt: FormEvent| {
                            let value = evt.value();
                            query.set(value.clone());
                            inbox.refresh(value, Some(SEARCH_DEBOUNCE_MS));
                        },
                    }
                }

                if *inbox.loading.read() {
                    div {
                        class: "status",
                        "Loading emails..."
                    }
                } else {
                    ul {
                        class: "email-list",
                        for email in inbox.emails.cloned() {
                            EmailRow {
                                key: "{email.id}",
                                email: email.clone(),
                                selected: selected_id == Some(email.id),
                                onselect: move |email: Email| inbox.open(email),
                            }
                        }
                    }
                }
            }

            div {
                class: "reader",
                if let Some(err) = inbox.error.cloned() {
                    div {
                        class: "error",
                        "{err}"
                    }
                }
                if let Some(email) = inbox.selected.cloned() {
                    MessageView { email }
                } else {
                    div {
                        class: "placeholder",
                        "Select an email to read"
                    }
                }
            }

            button {
                class: "fab",
                title: "Compose",
                onclick: move |_| composing.set(true),
                "+"
            }

            if composing() {
                Compose {
                    onclose: move |_| composing.set(false),
                    onsent: move |email: Email| {
                        inbox.prepend(email);
                        composing.set(false);
                    },
                }
            }
        }
    }
}

#[component]
fn EmailRow(email: Email, selected: bool, onselect: EventHandler<Email>) -> Element {
    let class = if selected {
        "email-item selected"
    } else {
        "email-item"
    };
    let date = format::relative_date(&email.created_at, &chrono::Utc::now());
    let clicked = email.clone();

    rsx! {
        li {
            class: "{class}",
            onclick: move |_| onselect.call(clicked.clone()),
            div {
                class: "avatar",
                "{format::initials(&email.to)}"
            }
            div {
                class: "summary",
                div { "{email.to}" }
                div { "{email.subject}" }
            }
            span {
                class: "date",
                "{date}"
            }
        }
    }
}

#[component]
fn MessageView(email: Email) -> Element {
    rsx! {
        div {
            class: "message",
            h2 { "{email.subject}" }
            div {
                class: "meta",
                div {
                    strong { "To: " }
                    "{email.to}"
                }
                if !email.cc.is_empty() {
                    div {
                        strong { "CC: " }
                        "{email.cc}"
                    }
                }
                if !email.bcc.is_empty() {
                    div {
                        strong { "BCC: " }
                        "{email.bcc}"
                    }
                }
                div {
                    strong { "Date: " }
                    "{format::full_date(&email.created_at)}"
                }
            }
            p {
                class: "body",
                "{email.body}"
            }
        }
    }
}

#[component]
fn Compose(onclose: EventHandler<()>, onsent: EventHandler<Email>) -> Element {
    let mut draft = use_signal(NewEmail::default);
    let mut sending = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let send = move |_: MouseEvent| {
        let email = draft.cloned();
        sending.set(true);

        spawn(async move {
            match ApiClient::new().create_email(&email).await {
                Ok(created) => onsent.call(created),
                Err(e) => {
                    error.set(Some(format!("Failed to send email: {e}")));
                    sending.set(false);
                }
            }
        });
    };

    let can_send = draft.read().has_required_fields() && !sending();

    rsx! {
        div {
            class: "backdrop",
            div {
                class: "compose",
                h3 { "Compose Email" }
                if let Some(err) = error() {
                    div {
                        class: "error",
                        "{err}"
                    }
                }
                input {
                    placeholder: "To",
                    value: draft.read().to.clone(),
                    oninput: move |evt: FormEvent| draft.write().to = evt.value(),
                }
                input {
                    placeholder: "CC",
                    value: draft.read().cc.clone(),
                    oninput: move |evt: FormEvent| draft.write().cc = evt.value(),
                }
                input {
                    placeholder: "BCC",
                    value: draft.read().bcc.clone(),
                    oninput: move |evt: FormEvent| draft.write().bcc = evt.value(),
                }
                input {
                    placeholder: "Subject",
                    value: draft.read().subject.clone(),
                    oninput: move |evt: FormEvent| draft.write().subject = evt.value(),
                }
                textarea {
                    placeholder: "Body",
                    rows: "8",
                    value: draft.read().body.clone(),
                    oninput: move |evt: FormEvent| draft.write().body = evt.value(),
                }
                div {
                    class: "actions",
                    button {
                        onclick: move |_| onclose.call(()),
                        "Cancel"
                    }
                    button {
                        class: "primary",
                        disabled: !can_send,
                        onclick: send,
                        "Send"
                    }
                }
            }
        }
    }
}
