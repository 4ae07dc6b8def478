//! Session/conversation controller for one tenant's support widget.
//!
//! Owns the session identity, the cached product catalog, and the message
//! log for a single tenant slug. Storage and gateway are injected; the
//! controller never touches ambient globals. One instance per tenant — a
//! slug change means constructing a new controller, so an in-flight reply
//! can never be attributed to the wrong tenant.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::gateway::ChatGateway;
use crate::storage::KeyValueStore;
use crate::templates;
use crate::types::{ChatMessage, ChatRole, GatewayReply, GatewayRequest};

const GENERIC_PRODUCT: &str = "product";
const SEND_FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

/// Title-case a tenant slug into a provisional display name. The gateway's
/// `company_name` overwrites this once it arrives.
pub fn derive_display_name(slug: &str) -> String {
    if slug.is_empty() {
        return "Support".to_string();
    }
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn session_key(slug: &str) -> String {
    format!("session_{slug}")
}

fn products_key(slug: &str) -> String {
    format!("products_{slug}")
}

/// Opaque client-side session token. Short enough that collisions are
/// possible; the backend only uses it to correlate turns.
fn new_session_id() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("session_{}", token.to_lowercase())
}

pub struct SupportWidget<G, S> {
    slug: String,
    session_id: String,
    company_name: String,
    messages: Vec<ChatMessage>,
    input: String,
    pending: bool,
    last_error: Option<String>,
    products: Vec<String>,
    products_loaded: bool,
    identified_product: Option<String>,
    has_sent: bool,
    gateway: G,
    store: S,
}

impl<G, S> SupportWidget<G, S>
where
    G: ChatGateway,
    S: KeyValueStore,
{
    /// Resolve or create the durable session id, load the cached catalog,
    /// and seed the input field. Local state only; call
    /// [`refresh_company_info`](Self::refresh_company_info) right after to
    /// fetch the authoritative company name and catalog.
    pub fn initialize(slug: impl Into<String>, gateway: G, store: S) -> Self {
        let slug = slug.into();

        let session_id = match store.get(&session_key(&slug)) {
            Ok(Some(id)) if !id.is_empty() => id,
            Ok(_) => new_session_id(),
            Err(err) => {
                tracing::debug!("session store unavailable: {err}");
                new_session_id()
            }
        };
        if let Err(err) = store.set(&session_key(&slug), &session_id) {
            tracing::debug!("failed to persist session id: {err}");
        }

        let mut widget = Self {
            company_name: derive_display_name(&slug),
            session_id,
            messages: Vec::new(),
            input: String::new(),
            pending: false,
            last_error: None,
            products: Vec::new(),
            products_loaded: false,
            identified_product: None,
            has_sent: false,
            slug,
            gateway,
            store,
        };

        match widget.store.get(&products_key(&widget.slug)) {
            Ok(Some(cached)) => {
                // A present but unparseable or empty cache leaves the input
                // empty and the catalog unloaded.
                if let Ok(products) = serde_json::from_str::<Vec<String>>(&cached) {
                    if !products.is_empty() {
                        widget.products = products;
                        widget.products_loaded = true;
                        widget.input = widget.seeded_input();
                    }
                }
            }
            Ok(None) | Err(_) => {
                widget.input = templates::render_seed_input(GENERIC_PRODUCT);
            }
        }

        widget
    }

    /// Zero-message probe for the authoritative company name and product
    /// catalog. Failures are not surfaced; the catalog is marked loaded
    /// anyway so the send control becomes usable.
    pub async fn refresh_company_info(&mut self) {
        let request = GatewayRequest {
            slug: self.slug.clone(),
            message: String::new(),
            session_id: None,
        };

        match self.gateway.exchange(&request).await {
            Ok(reply) => {
                if let Some(name) = reply.company_name {
                    self.company_name = name;
                }
                if !reply.products.is_empty() {
                    self.products = reply.products;
                    self.products_loaded = true;
                    match serde_json::to_string(&self.products) {
                        Ok(encoded) => {
                            if let Err(err) = self.store.set(&products_key(&self.slug), &encoded) {
                                tracing::debug!("failed to cache product catalog: {err}");
                            }
                        }
                        Err(err) => tracing::debug!("failed to encode product catalog: {err}"),
                    }
                    if !self.has_sent {
                        self.input = self.seeded_input();
                    }
                }
            }
            Err(err) => {
                tracing::warn!("company info fetch failed: {err}");
                self.products_loaded = true;
            }
        }
    }

    /// Submit one user turn and reconcile the reply. No-op unless the
    /// trimmed input is non-empty, no call is pending, and the catalog is
    /// loaded.
    pub async fn send_message(&mut self, raw_input: &str) {
        let message = raw_input.trim().to_string();
        if message.is_empty() || self.pending || !self.products_loaded {
            return;
        }

        self.has_sent = true;
        self.input.clear();
        self.pending = true;
        self.last_error = None;
        self.messages
            .push(ChatMessage::new(ChatRole::User, message.as_str()));

        let request = GatewayRequest {
            slug: self.slug.clone(),
            message,
            session_id: Some(self.session_id.clone()),
        };

        match self.gateway.exchange(&request).await {
            Ok(reply) => self.apply_reply(reply),
            Err(err) => {
                tracing::warn!("message turn failed: {err}");
                self.last_error = Some(SEND_FAILURE_MESSAGE.to_string());
            }
        }

        self.pending = false;
    }

    /// Reply fields apply independently; an error does not suppress an
    /// accompanying assistant message.
    fn apply_reply(&mut self, reply: GatewayReply) {
        if let Some(error) = reply.error {
            self.last_error = Some(error);
        }
        if let Some(text) = reply.response {
            self.messages.push(ChatMessage::new(ChatRole::Assistant, text));
        }
        if let Some(name) = reply.company_name {
            self.company_name = name;
        }
        if !reply.products.is_empty() {
            // In-memory only; the durable cache is refreshed by the info
            // probe, not by message turns.
            self.products = reply.products;
            // Explicit null clears the identification, a value replaces it,
            // an absent field leaves the previous identification in place.
            if let Some(identified) = reply.identified_product {
                self.identified_product = identified;
            }
        }
    }

    /// Start over under a fresh session identity. The learned catalog and
    /// company name survive; everything conversational is dropped.
    pub fn reset_conversation(&mut self) {
        self.session_id = new_session_id();
        if let Err(err) = self.store.set(&session_key(&self.slug), &self.session_id) {
            tracing::debug!("failed to persist session id: {err}");
        }

        self.messages.clear();
        self.identified_product = None;
        self.last_error = None;
        self.has_sent = false;
        self.input = if self.products.is_empty() {
            templates::render_seed_input(GENERIC_PRODUCT)
        } else {
            self.seeded_input()
        };
    }

    fn seeded_input(&self) -> String {
        let product = self
            .products
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(GENERIC_PRODUCT);
        templates::render_seed_input(product)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn products_loaded(&self) -> bool {
        self.products_loaded
    }

    pub fn identified_product(&self) -> Option<&str> {
        self.identified_product.as_deref()
    }

    pub fn has_sent(&self) -> bool {
        self.has_sent
    }
}
