//! Unit tests for the Mercado Libre client.


use crate::mercadolibre::MercadoLibreApi;
use crate::pacing::Pacer;

/// Creates a client pointing at the given mock server, without pacing.
pub(super) fn api_with_mock(mock_uri: &str) -> MercadoLibreApi {
    MercadoLibreApi::new("98765".to_string())
        .with_pacer(Pacer::disabled())
        .with_base_url(mock_uri)
}

#[test]
fn creates_api_with_default_base_url() {
    let api = MercadoLibreApi::new("98765".to_string());
    assert_eq!(api.base_url, "https://api.mercadolibre.com");
    assert_eq!(api.user_id, "98765");
    assert!(api.access_token.is_none());
}
