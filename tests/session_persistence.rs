//! Warm-boot behavior against the file-backed store: session identity and
//! the learned product catalog survive process restarts, and reset rotates
//! the durable session id.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use support_widget::{
    ChatGateway, FileStore, GatewayError, GatewayReply, GatewayRequest, KeyValueStore,
    SupportWidget,
};

struct StubGateway {
    replies: Mutex<VecDeque<GatewayReply>>,
}

impl StubGateway {
    fn new(replies: Vec<GatewayReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl ChatGateway for StubGateway {
    async fn exchange(&self, _request: &GatewayRequest) -> Result<GatewayReply, GatewayError> {
        match self.replies.lock().pop_front() {
            Some(reply) => Ok(reply),
            None => Err(GatewayError::Transport("backend offline".to_string())),
        }
    }
}

#[tokio::test]
async fn session_and_catalog_survive_restarts() {
    let dir = tempfile::tempdir().unwrap();

    // First visit: cold start, generic input, then the info probe learns
    // the catalog and caches it on disk.
    let first_gateway = StubGateway::new(vec![GatewayReply {
        company_name: Some("Acme Tools Inc".to_string()),
        products: vec!["Pump".to_string(), "Valve".to_string()],
        ..Default::default()
    }]);
    let mut first =
        SupportWidget::initialize("acme-tools", first_gateway, FileStore::new(dir.path()));
    let first_session = first.session_id().to_string();
    assert_eq!(first.input(), "my product is not functioning properly.");

    first.refresh_company_info().await;
    assert!(first.products_loaded());
    drop(first);

    // Reload: same session id, catalog served from the durable cache
    // before any network call, input pre-seeded with a known product.
    let second = SupportWidget::initialize(
        "acme-tools",
        StubGateway::new(vec![]),
        FileStore::new(dir.path()),
    );
    assert_eq!(second.session_id(), first_session);
    assert!(second.products_loaded());
    assert_eq!(second.products(), ["Pump", "Valve"]);
    assert!(second
        .products()
        .iter()
        .any(|p| second.input().contains(p.as_str())));
    drop(second);

    // Reset rotates the durable session id but keeps the cached catalog.
    let mut third = SupportWidget::initialize(
        "acme-tools",
        StubGateway::new(vec![]),
        FileStore::new(dir.path()),
    );
    third.reset_conversation();
    let rotated = third.session_id().to_string();
    assert_ne!(rotated, first_session);
    drop(third);

    let fourth = SupportWidget::initialize(
        "acme-tools",
        StubGateway::new(vec![]),
        FileStore::new(dir.path()),
    );
    assert_eq!(fourth.session_id(), rotated);
    assert_eq!(fourth.products(), ["Pump", "Valve"]);
}

#[tokio::test]
async fn tenants_do_not_share_session_or_catalog() {
    let dir = tempfile::tempdir().unwrap();

    let acme = SupportWidget::initialize(
        "acme",
        StubGateway::new(vec![]),
        FileStore::new(dir.path()),
    );
    let globex = SupportWidget::initialize(
        "globex",
        StubGateway::new(vec![]),
        FileStore::new(dir.path()),
    );

    assert_ne!(acme.session_id(), globex.session_id());

    let store = FileStore::new(dir.path());
    assert_eq!(
        store.get("session_acme").unwrap().as_deref(),
        Some(acme.session_id())
    );
    assert_eq!(
        store.get("session_globex").unwrap().as_deref(),
        Some(globex.session_id())
    );
}
