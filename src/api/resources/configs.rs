//! Themes and strings resources.
//!
//! Both resources share one contract:
//!
//! - the list (`/mxxn/themes`) returns `[{"id": ..., "theme": ...}]` in name
//!   order; the `fields` query parameter restricts the keys of each item and
//!   may be repeated or comma separated
//! - the item (`/mxxn/themes/{id}`) returns the aggregated configuration,
//!   `204 No Content` for an unknown id, and rejects any query string

use actix_web::{HttpRequest, HttpResponse, web};
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::configs::{self, ConfigKind};
use crate::errors::MxxnError;
use crate::routing::Resource;

/// Suffix of the item responder.
pub const ITEM: &str = "id";

const FIELDS: &str = "fields";
const ID: &str = "id";

/// The themes of the application.
pub struct Themes;

/// The strings of the application, one configuration per locale.
pub struct Strings;

#[async_trait(?Send)]
impl Resource for Themes {
    fn suffixes(&self) -> &'static [&'static str] {
        &[ITEM]
    }

    async fn respond(
        &self,
        req: &HttpRequest,
        _body: web::Bytes,
        suffix: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        respond(req, suffix, ConfigKind::Themes, "theme", "id")
    }
}

#[async_trait(?Send)]
impl Resource for Strings {
    fn suffixes(&self) -> &'static [&'static str] {
        &[ITEM]
    }

    async fn respond(
        &self,
        req: &HttpRequest,
        _body: web::Bytes,
        suffix: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        respond(req, suffix, ConfigKind::Strings, "strings", "locale")
    }
}

fn respond(
    req: &HttpRequest,
    suffix: Option<&str>,
    kind: ConfigKind,
    key: &'static str,
    param: &str,
) -> Result<HttpResponse, ApiError> {
    let state = AppState::of(req)?;

    match suffix {
        Some(ITEM) => {
            if !req.query_string().is_empty() {
                return Err(ApiError::bad_request(
                    "Query string",
                    "The resource does not accept a query string.",
                ));
            }

            let id = req.match_info().get(param).unwrap_or_default();
            match configs::aggregate(&state.env, &state.settings, kind, id) {
                Ok(config) => Ok(HttpResponse::Ok().json(config)),
                Err(MxxnError::ConfigNotFound(_)) => Ok(HttpResponse::NoContent().finish()),
                Err(err) => Err(err.into()),
            }
        }
        Some(_) => Err(ApiError::NotFound),
        None => {
            let fields = parse_fields(req.query_string(), &[ID, key])?;
            let names = configs::mxxn_dir(&state.env, kind)?.names().to_vec();

            let mut items = Vec::with_capacity(names.len());
            for name in names {
                let mut item = Map::new();
                if fields.contains(&ID) {
                    item.insert(ID.to_string(), Value::String(name.clone()));
                }
                if fields.contains(&key) {
                    item.insert(
                        key.to_string(),
                        configs::aggregate(&state.env, &state.settings, kind, &name)?,
                    );
                }
                items.push(Value::Object(item));
            }

            Ok(HttpResponse::Ok().json(items))
        }
    }
}

/// Parse the `fields` query parameter.
///
/// Without a query string all allowed fields are selected.
pub fn parse_fields<'a>(query: &str, allowed: &[&'a str]) -> Result<Vec<&'a str>, ApiError> {
    if query.is_empty() {
        return Ok(allowed.to_vec());
    }

    let mut fields = Vec::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if name != FIELDS {
            return Err(ApiError::bad_request(
                "Query parameter",
                format!("The query parameter {} is not allowed.", name),
            ));
        }

        for field in value.split(',') {
            let Some(field) = allowed.iter().find(|candidate| **candidate == field) else {
                return Err(ApiError::bad_request(
                    "Query parameter",
                    format!(
                        "The value {} of the query parameter fields is not one of {}.",
                        field,
                        allowed.join(", ")
                    ),
                ));
            };
            if !fields.contains(field) {
                fields.push(*field);
            }
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let allowed = ["id", "theme"];
        assert_eq!(parse_fields("", &allowed).unwrap(), vec!["id", "theme"]);
        assert_eq!(parse_fields("fields=id", &allowed).unwrap(), vec!["id"]);
        assert_eq!(
            parse_fields("fields=theme&fields=id", &allowed).unwrap(),
            vec!["theme", "id"]
        );
        assert_eq!(parse_fields("fields=id,theme", &allowed).unwrap(), vec!["id", "theme"]);
    }

    #[test]
    fn test_parse_fields_rejects() {
        let allowed = ["id", "theme"];
        for query in ["other=id", "fields=name", "fields=", "fields=id,,theme"] {
            let err = parse_fields(query, &allowed).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest { ref title, .. } if title == "Query parameter"));
        }
    }
}
