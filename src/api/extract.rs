// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Extractors that normalise request input before handlers see it.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{event_name_from_path, Validate};

/// Like [`Json`], but rejects with [`ApiError`] and returns the normalised
/// body.
///
/// A missing or wrong `Content-Type` is a 415; anything else wrong with the
/// body (syntax, types, missing fields, failed validation) is a 422.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::MissingJsonContentType(e) => {
                    ApiError::unsupported_media_type(e.body_text())
                }
                other => ApiError::unprocessable(other.body_text()),
            })?;

        let value = value
            .validate()
            .map_err(|e| ApiError::unprocessable(e.to_string()))?;
        Ok(ValidatedJson(value))
    }
}

/// `{event_name}` path segment, trimmed the same way body names are.
pub struct EventNamePath(pub String);

impl<S> FromRequestParts<S> for EventNamePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::new(rejection.status(), "invalid_path", rejection.body_text())
            })?;

        let name =
            event_name_from_path(raw).map_err(|e| ApiError::unprocessable(e.to_string()))?;
        Ok(EventNamePath(name))
    }
}
