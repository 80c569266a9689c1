use crate::application::booking::BookingApplicationError;
use crate::domain::{BookingValidationError, BusinessId};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::error::ApiError;

/// テナントを伝えるヘッダー名
///
/// 認証ゲートウェイが検証済みのセッションから設定する。
pub const BUSINESS_ID_HEADER: &str = "x-business-id";

/// リクエストのテナント（事業者）
pub struct BusinessContext(pub BusinessId);

#[async_trait]
impl<S> FromRequestParts<S> for BusinessContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(BUSINESS_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(BusinessId::from_uuid)
            .filter(|id| !id.is_nil())
            .map(BusinessContext)
            .ok_or_else(|| {
                BookingApplicationError::Validation(BookingValidationError::BusinessIdRequired)
                    .into()
            })
    }
}
