//! Unit tests for the Tienda Nube client.


use crate::pacing::Pacer;
use crate::tiendanube::TiendaNubeApi;

/// Creates a client pointing at the given mock server, without pacing.
pub(super) fn api_with_mock(mock_uri: &str) -> TiendaNubeApi {
    TiendaNubeApi::new("tn_token".to_string(), "4321")
        .with_pacer(Pacer::disabled())
        .with_base_url(mock_uri)
}

#[test]
fn creates_api_with_store_base_url() {
    let api = TiendaNubeApi::new("tn_token".to_string(), "4321");
    assert_eq!(api.base_url, "https://api.tiendanube.com/v1/4321");
    assert_eq!(api.auth_header(), "bearer tn_token");
}
