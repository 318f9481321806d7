//! Blocking HTTP implementation of the backend contract.
//!
//! # Responsibility
//! - Issue the JSON calls from [`super::SyncBackend`] against a base URL.
//! - Attach the anti-forgery token to every mutating request.
//!
//! # Invariants
//! - The CSRF token is captured once at construction and never refreshed.
//! - HTTP status errors become [`SyncError::Rejected`] with the server
//!   message when one can be decoded; transport errors become
//!   [`SyncError::Network`].

use crate::model::board::{Link, LinkId, Section, SectionId};
use crate::session;
use crate::sync::{
    AddLinkRequest, AddLinkResponse, AddSectionResponse, DeleteItemRequest, ItemDetail, ItemKind,
    ReorderLinksRequest, ReorderSectionsRequest, SaveItemRequest, StatusEnvelope, SyncBackend,
    SyncError, SyncResult, STATUS_SUCCESS,
};
use log::warn;
use serde::Serialize;

/// Header carrying the anti-forgery token on mutating calls.
pub const CSRF_HEADER: &str = "X-CSRFToken";

const REORDER_SECTIONS_PATH: &str = "/api/update-section-order/";
const REORDER_LINKS_PATH: &str = "/api/update-link-order/";
const GET_ITEM_PATH: &str = "/api/get-item-details/";
const SAVE_ITEM_PATH: &str = "/api/save-item-details/";
const ADD_LINK_PATH: &str = "/api/add-link/";
const ADD_SECTION_PATH: &str = "/api/add-section/";
const DELETE_ITEM_PATH: &str = "/api/delete-item/";
const UPDATE_THEME_PATH: &str = "/api/update-theme/";

#[derive(Serialize)]
struct UpdateThemeRequest<'a> {
    theme_id: &'a str,
}

#[derive(Serialize)]
struct AddSectionRequest<'a> {
    name: &'a str,
}

/// Stateless request client for one authenticated page session.
pub struct HttpSyncBackend {
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpSyncBackend {
    /// Creates a client with an explicit token.
    pub fn new(base_url: impl Into<String>, csrf_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            csrf_token,
        }
    }

    /// Creates a client capturing the token from the page's cookie header.
    pub fn from_cookie_header(base_url: impl Into<String>, cookie_header: &str) -> Self {
        let csrf_token = session::csrf_token(cookie_header);
        if csrf_token.is_none() {
            warn!("event=csrf_missing module=sync status=degraded");
        }
        Self::new(base_url, csrf_token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Issues one POST with a JSON body and the CSRF header.
    fn post<B: Serialize>(&self, path: &str, body: &B) -> SyncResult<ureq::Response> {
        let mut request = ureq::post(&self.url(path)).set("Content-Type", "application/json");
        if let Some(token) = &self.csrf_token {
            request = request.set(CSRF_HEADER, token);
        }

        match request.send_json(body) {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(code, response)) => {
                let envelope: StatusEnvelope =
                    response.into_json().unwrap_or_else(|_| StatusEnvelope {
                        status: "error".to_string(),
                        message: Some(format!("HTTP {code}")),
                    });
                warn!("event=backend_rejection module=sync path={path} code={code}");
                Err(SyncError::Rejected {
                    message: envelope.message,
                })
            }
            Err(err) => {
                warn!("event=network_failure module=sync path={path}");
                Err(SyncError::Network(err.to_string()))
            }
        }
    }

    fn post_enveloped<B: Serialize>(&self, path: &str, body: &B) -> SyncResult<()> {
        let envelope: StatusEnvelope = self
            .post(path, body)?
            .into_json()
            .map_err(|err| SyncError::InvalidResponse(err.to_string()))?;
        envelope.accept()
    }
}

impl SyncBackend for HttpSyncBackend {
    fn reorder_sections(&self, ids: &[SectionId]) -> SyncResult<()> {
        // Response body is not part of this call's contract.
        self.post(
            REORDER_SECTIONS_PATH,
            &ReorderSectionsRequest { ids: ids.to_vec() },
        )?;
        Ok(())
    }

    fn reorder_links(&self, section_id: &str, link_ids: &[LinkId]) -> SyncResult<()> {
        self.post(
            REORDER_LINKS_PATH,
            &ReorderLinksRequest {
                section_id: section_id.to_string(),
                link_ids: link_ids.to_vec(),
            },
        )?;
        Ok(())
    }

    fn get_item(&self, kind: ItemKind, id: &str) -> SyncResult<ItemDetail> {
        let response = ureq::get(&self.url(GET_ITEM_PATH))
            .query("type", kind.as_str())
            .query("id", id)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => SyncError::Rejected {
                    message: Some(format!("HTTP {code}")),
                },
                other => SyncError::Network(other.to_string()),
            })?;
        response
            .into_json()
            .map_err(|err| SyncError::InvalidResponse(err.to_string()))
    }

    fn save_item(&self, request: &SaveItemRequest) -> SyncResult<()> {
        self.post_enveloped(SAVE_ITEM_PATH, request)
    }

    fn add_link(&self, request: &AddLinkRequest) -> SyncResult<Link> {
        let response: AddLinkResponse = self
            .post(ADD_LINK_PATH, request)?
            .into_json()
            .map_err(|err| SyncError::InvalidResponse(err.to_string()))?;
        if response.status != STATUS_SUCCESS {
            return Err(SyncError::Rejected {
                message: response.message,
            });
        }
        response
            .link
            .map(Link::from)
            .ok_or_else(|| SyncError::InvalidResponse("add-link response missing link".to_string()))
    }

    fn add_section(&self, name: &str) -> SyncResult<Section> {
        let response: AddSectionResponse = self
            .post(ADD_SECTION_PATH, &AddSectionRequest { name })?
            .into_json()
            .map_err(|err| SyncError::InvalidResponse(err.to_string()))?;
        if response.status != STATUS_SUCCESS {
            return Err(SyncError::Rejected {
                message: response.message,
            });
        }
        response.section.map(Section::from).ok_or_else(|| {
            SyncError::InvalidResponse("add-section response missing section".to_string())
        })
    }

    fn delete_item(&self, kind: ItemKind, id: &str) -> SyncResult<()> {
        self.post_enveloped(
            DELETE_ITEM_PATH,
            &DeleteItemRequest {
                kind,
                id: id.to_string(),
            },
        )
    }

    fn update_theme(&self, theme_id: &str) -> SyncResult<()> {
        self.post_enveloped(UPDATE_THEME_PATH, &UpdateThemeRequest { theme_id })
    }
}
