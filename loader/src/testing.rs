//! In-memory transport and fixtures for unit tests

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use error_stack::Report;
use serde_json::json;
use tokio::sync::Notify;

use crate::transport::{FetchResponse, Transport, TransportError, TransportResult};

pub const BASE_URL: &str = "https://swapi.test/api";

struct Route {
    outcome: Result<FetchResponse, TransportError>,
    gate:    Option<Arc<Notify>>,
}

/// Transport that answers from a per-URL script and records every request
///
/// Unscripted URLs answer `404 Not Found`. A held route waits for its gate to be
/// notified before answering.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    calls:  Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: FetchResponse) {
        self.script(url, Ok(response));
    }

    pub fn fail(&self, url: &str, error: TransportError) {
        self.script(url, Err(error));
    }

    /// Make an already scripted URL wait until the returned gate is notified
    pub fn hold(&self, url: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        let mut routes = self.routes.lock().unwrap();
        let route = routes.get_mut(url).unwrap();
        route.gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn script(&self, url: &str, outcome: Result<FetchResponse, TransportError>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route { outcome, gate: None });
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &str) -> TransportResult<FetchResponse> {
        self.calls.lock().unwrap().push(url.to_string());

        let (outcome, gate) = {
            let routes = self.routes.lock().unwrap();
            routes.get(url).map_or_else(
                || (Ok(FetchResponse::new(404, "Not Found", "")), None),
                |route| (route.outcome.clone(), route.gate.clone()),
            )
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        outcome.map_err(Report::new)
    }
}

pub fn character_url(id: &str) -> String {
    format!("{BASE_URL}/people/{id}/")
}

pub fn planet_url(id: &str) -> String {
    format!("{BASE_URL}/planets/{id}/")
}

/// JSON body of a character record as the upstream API returns it
pub fn character_body(name: &str, homeworld: &str, films: &[&str]) -> String {
    json!({
        "name": name,
        "height": "172",
        "mass": "77",
        "hair_color": "blond",
        "skin_color": "fair",
        "eye_color": "blue",
        "birth_year": "19BBY",
        "gender": "male",
        "homeworld": homeworld,
        "films": films,
        "url": "ignored"
    })
    .to_string()
}

pub fn planet_body(name: &str) -> String {
    json!({ "name": name, "climate": "arid", "terrain": "desert" }).to_string()
}

/// Script a character whose homeworld also resolves
pub fn script_character(
    transport: &ScriptedTransport,
    id: &str,
    name: &str,
    planet_id: &str,
    planet: &str,
) {
    transport.respond(
        &character_url(id),
        FetchResponse::ok(character_body(
            name,
            &planet_url(planet_id),
            &["https://swapi.test/api/films/1/", "https://swapi.test/api/films/3/"],
        )),
    );
    transport.respond(&planet_url(planet_id), FetchResponse::ok(planet_body(planet)));
}
