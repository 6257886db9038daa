// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use ledgerdesk_api::Client;
use ledgerdesk_app::{FetchError, ScreenKind, ScreenRows};
use ledgerdesk_tui::{InternalEvent, ViewRuntime};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::debug;

/// Fetches over HTTP on a worker thread per request. Without a client
/// (offline mode) every fetch fails with `FetchError::Offline`.
pub struct ApiRuntime {
    client: Option<Client>,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn offline() -> Self {
        Self { client: None }
    }
}

impl ViewRuntime for ApiRuntime {
    fn fetch_screen(&mut self, screen: ScreenKind) -> Result<ScreenRows, FetchError> {
        match &self.client {
            Some(client) => client.fetch_screen(screen),
            None => Err(FetchError::Offline),
        }
    }

    fn spawn_fetch(
        &mut self,
        request_id: u64,
        screen: ScreenKind,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let Some(client) = self.client.clone() else {
            tx.send(InternalEvent::Fetched {
                request_id,
                screen,
                outcome: Err(FetchError::Offline),
            })
            .map_err(|_| anyhow!("fetch event channel closed"))?;
            return Ok(());
        };

        thread::Builder::new()
            .name(format!("fetch-{}", screen.as_str()))
            .spawn(move || {
                let outcome = client.fetch_screen(screen);
                if tx
                    .send(InternalEvent::Fetched {
                        request_id,
                        screen,
                        outcome,
                    })
                    .is_err()
                {
                    debug!(screen = screen.as_str(), request_id, "ui gone; fetch result dropped");
                }
            })
            .context("spawn fetch worker")?;
        Ok(())
    }
}
