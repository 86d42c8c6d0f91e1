//! What this run can do, decided once at startup.
//!
//! The record is probed before any document is touched and then injected
//! into the pipeline and batch driver. Nothing is re-probed mid-run.

use std::sync::Arc;

use crate::config::ResolvedConfig;
use crate::input::{PdfExtractor, detect_pdf};
use crate::translation::{ArgosProvider, OnlineProvider, Provider};

#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    pub offline: Option<Arc<dyn Provider>>,
    pub online: Option<Arc<dyn Provider>>,
    pub pdf: Option<Arc<dyn PdfExtractor>>,
    /// Why a capability is missing, one line each.
    pub diagnostics: Vec<String>,
}

impl Capabilities {
    /// Nothing available: conversion only, PDFs skipped.
    pub fn none() -> Self {
        Self::default()
    }

    /// Probes the providers and extractors the configuration asks for.
    pub async fn probe(config: &ResolvedConfig) -> Self {
        let mut capabilities = Self {
            diagnostics: config.notes.clone(),
            ..Self::default()
        };

        if let Some(command) = &config.offline_command {
            match ArgosProvider::probe(command).await {
                Ok(provider) => capabilities.offline = Some(Arc::new(provider)),
                Err(e) => {
                    log::debug!("Offline probe failed: {e}");
                    capabilities
                        .diagnostics
                        .push(format!("Offline translation unavailable: {e}"));
                }
            }
        }

        if let Some(settings) = &config.online {
            capabilities.online = Some(Arc::new(OnlineProvider::new(settings)));
        } else if config.translate {
            capabilities
                .diagnostics
                .push("Online translation unavailable: no provider configured".to_string());
        }

        capabilities.pdf = detect_pdf();
        if capabilities.pdf.is_none() {
            capabilities.diagnostics.push(
                "PDF extraction unavailable: built without the 'pdf' feature".to_string(),
            );
        }

        capabilities
    }

    /// Providers in fallback order: offline first, online second.
    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        self.offline
            .iter()
            .chain(self.online.iter())
            .cloned()
            .collect()
    }

    pub fn can_translate(&self) -> bool {
        self.offline.is_some() || self.online.is_some()
    }
}
