//! Octopus LSP server implementation
//!
//! Holds the open documents and the active catalog. The catalog is an
//! immutable snapshot behind an `Arc`; switching versions builds a new one
//! and swaps it in, so requests in flight keep the snapshot they started with.

use dashmap::DashMap;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{error, info, warn};

use super::capabilities::{
    get_server_capabilities, CMD_AUTO_DETECT_VERSION, CMD_DETECT_SYSTEM_VERSION,
    CMD_SHOW_VARIABLES, CMD_SWITCH_VERSION, CMD_TOGGLE_INLAY_HINTS,
};
use super::code_actions::quick_fixes;
use super::completion::completions;
use super::diagnostics::document_diagnostics;
use super::document::{utf16_to_char, OctoDocument};
use super::hover::hover_at;
use super::inlay_hints::inlay_hints;
use crate::catalog::{Catalog, DEFAULT_VERSION};
use crate::config::Settings;
use crate::error::OctoResult;
use crate::version::{auto_detect, SystemProbe, VersionProbe};

/// Octopus Language Server
pub struct OctopusLsp {
    /// LSP client for sending notifications
    client: Client,
    /// Open documents
    documents: DashMap<Url, OctoDocument>,
    /// Active variable catalog
    catalog: RwLock<Arc<Catalog>>,
    settings: RwLock<Settings>,
    probe: Arc<dyn VersionProbe>,
    /// Result of the last explicit detection
    detected_version: RwLock<Option<String>>,
    workspace_roots: RwLock<Vec<PathBuf>>,
}

impl OctopusLsp {
    pub fn new(client: Client) -> Self {
        Self::with_probe(client, Arc::new(SystemProbe::default()))
    }

    /// Build a server that asks `probe` for the installed version
    pub fn with_probe(client: Client, probe: Arc<dyn VersionProbe>) -> Self {
        let catalog = Catalog::bundled(DEFAULT_VERSION)
            .unwrap_or_else(|_| Catalog::from_specs(DEFAULT_VERSION, Vec::new()));
        Self {
            client,
            documents: DashMap::new(),
            catalog: RwLock::new(Arc::new(catalog)),
            settings: RwLock::new(Settings::default()),
            probe,
            detected_version: RwLock::new(None),
            workspace_roots: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the active catalog
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Version reported by the last detection command, if any
    pub fn detected_version(&self) -> Option<String> {
        self.detected_version
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn document(&self, uri: &Url) -> Option<OctoDocument> {
        self.documents.get(uri).map(|doc| doc.value().clone())
    }

    fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    async fn log(&self, kind: MessageType, message: String) {
        self.client.log_message(kind, message).await;
    }

    /// Validate a document and publish its diagnostics
    async fn publish_diagnostics(&self, uri: Url) {
        let Some(doc) = self.document(&uri) else {
            return;
        };
        let diagnostics = document_diagnostics(&doc, &self.catalog());
        self.client
            .publish_diagnostics(uri, diagnostics, Some(doc.version))
            .await;
    }

    async fn republish_all(&self) {
        let uris: Vec<Url> = self.documents.iter().map(|e| e.key().clone()).collect();
        for uri in uris {
            self.publish_diagnostics(uri).await;
        }
    }

    async fn refresh_inlay_hints(&self) {
        if let Err(e) = self.client.inlay_hint_refresh().await {
            warn!("Inlay hint refresh failed: {}", e);
        }
    }

    /// Load `version` and make it the active catalog
    pub async fn switch_version(&self, version: &str) -> OctoResult<()> {
        let data_dir = self.settings().data_dir;
        let catalog = match Catalog::load(version, data_dir.as_deref()) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("{}", e);
                self.client
                    .show_message(MessageType::ERROR, format!("Failed to switch version: {}", e))
                    .await;
                return Err(e);
            }
        };

        let count = catalog.len();
        self.set_catalog(catalog);
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .version = version.to_string();

        info!("Switched to Octopus {} ({} variables)", version, count);
        self.log(
            MessageType::INFO,
            format!("Switched to Octopus version {} ({} variables)", version, count),
        )
        .await;

        self.republish_all().await;
        self.refresh_inlay_hints().await;
        Ok(())
    }

    async fn detect_system_version(&self) -> Option<String> {
        let detected = self.probe.probe().await;
        *self
            .detected_version
            .write()
            .unwrap_or_else(PoisonError::into_inner) = detected.clone();
        detected
    }

    async fn auto_detect_version(&self, active: Option<&Url>) -> Value {
        let content = active.and_then(|uri| self.document(uri)).map(|d| d.text());
        let roots = self
            .workspace_roots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let detected = auto_detect(self.probe.as_ref(), content.as_deref(), roots.as_slice()).await;
        *self
            .detected_version
            .write()
            .unwrap_or_else(PoisonError::into_inner) = detected.clone();

        let Some(version) = detected else {
            self.client
                .show_message(MessageType::WARNING, "Could not auto-detect Octopus version")
                .await;
            return json!({ "detected": null, "switched": false });
        };

        let current = self.catalog().version().to_string();
        let settings = self.settings();
        let available = Catalog::available_versions(settings.data_dir.as_deref());

        let switched = if version == current {
            self.log(
                MessageType::INFO,
                format!("Already using detected version: {}", version),
            )
            .await;
            false
        } else if available.contains(&version) {
            self.switch_version(&version).await.is_ok()
        } else {
            self.client
                .show_message(
                    MessageType::WARNING,
                    format!(
                        "Detected Octopus {}, but no variable information is available for it",
                        version
                    ),
                )
                .await;
            false
        };

        json!({ "detected": version, "switched": switched })
    }

    async fn toggle_inlay_hints(&self) -> bool {
        let enabled = {
            let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
            settings.inlay_hints.enabled = !settings.inlay_hints.enabled;
            settings.inlay_hints.enabled
        };
        self.log(
            MessageType::INFO,
            format!("Inlay hints {}", if enabled { "enabled" } else { "disabled" }),
        )
        .await;
        self.refresh_inlay_hints().await;
        enabled
    }

    fn variable_list(&self) -> Value {
        let catalog = self.catalog();
        let items: Vec<Value> = catalog
            .iter()
            .map(|spec| {
                json!({
                    "name": spec.name,
                    "section": spec.section,
                    "docUrl": catalog.doc_url_for(spec),
                })
            })
            .collect();
        Value::Array(items)
    }

    /// Apply new settings, reloading the catalog when the version or data directory changed
    async fn apply_settings(&self, new: Settings) {
        let old = self.settings();
        let reload = new.version != old.version || new.data_dir != old.data_dir;
        let version = new.version.clone();
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = new;

        if reload {
            // The old version stays active when the new one cannot be loaded
            if self.switch_version(&version).await.is_err() {
                self.settings
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .version = self.catalog().version().to_string();
            }
        } else {
            self.refresh_inlay_hints().await;
        }
    }
}

fn string_arg(arguments: &[Value], index: usize) -> Option<String> {
    arguments.get(index).and_then(Value::as_str).map(str::to_string)
}

#[tower_lsp::async_trait]
impl LanguageServer for OctopusLsp {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let settings = match params.initialization_options {
            Some(options) => Settings::from_lsp_value(options).unwrap_or_else(|e| {
                warn!("Ignoring initialization options: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        };

        #[allow(deprecated)]
        let root_uri = params.root_uri;
        let mut roots: Vec<PathBuf> = params
            .workspace_folders
            .unwrap_or_default()
            .iter()
            .filter_map(|folder| folder.uri.to_file_path().ok())
            .collect();
        if roots.is_empty() {
            if let Some(path) = root_uri.and_then(|uri| uri.to_file_path().ok()) {
                roots.push(path);
            }
        }
        *self
            .workspace_roots
            .write()
            .unwrap_or_else(PoisonError::into_inner) = roots;

        match Catalog::load_with_fallback(&settings.version, settings.data_dir.as_deref()) {
            Ok(catalog) => self.set_catalog(catalog),
            Err(e) => error!("{}", e),
        }
        let mut settings = settings;
        settings.version = self.catalog().version().to_string();
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;

        Ok(InitializeResult {
            capabilities: get_server_capabilities(),
            server_info: Some(ServerInfo {
                name: "Octopus Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let catalog = self.catalog();
        self.log(
            MessageType::INFO,
            format!(
                "Octopus LSP initialized with version {} ({} variables)",
                catalog.version(),
                catalog.len()
            ),
        )
        .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.documents
            .insert(doc.uri.clone(), OctoDocument::new(&doc.text, doc.version));
        self.publish_diagnostics(doc.uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        // Full sync: the last change carries the whole text
        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents
                .entry(uri.clone())
                .and_modify(|doc| doc.update(&change.text, version))
                .or_insert_with(|| OctoDocument::new(&change.text, version));
            self.publish_diagnostics(uri).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match Settings::from_lsp_value(params.settings) {
            Ok(settings) => self.apply_settings(settings).await,
            Err(e) => {
                warn!("Ignoring configuration change: {}", e);
                self.log(MessageType::WARNING, format!("Invalid settings: {}", e))
                    .await;
            }
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        let Some(line) = self.document(&uri).and_then(|d| d.line(pos.line as usize)) else {
            return Ok(None);
        };
        let col = utf16_to_char(&line, pos.character);
        Ok(hover_at(pos.line as usize, &line, col, &self.catalog()))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;
        let Some(line) = self.document(&uri).and_then(|d| d.line(pos.line as usize)) else {
            return Ok(None);
        };
        let col = utf16_to_char(&line, pos.character);
        let before: String = line.chars().take(col).collect();
        Ok(Some(CompletionResponse::Array(completions(
            &before,
            &self.catalog(),
        ))))
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let Some(doc) = self.document(&uri) else {
            return Ok(None);
        };
        let actions = quick_fixes(&uri, &params.context.diagnostics, &self.catalog(), |i| {
            doc.line(i)
        });
        Ok(Some(actions))
    }

    async fn inlay_hint(&self, params: InlayHintParams) -> Result<Option<Vec<InlayHint>>> {
        let Some(doc) = self.document(&params.text_document.uri) else {
            return Ok(None);
        };
        let settings = self.settings();
        Ok(Some(inlay_hints(
            &doc,
            params.range.start.line as usize,
            params.range.end.line as usize,
            &self.catalog(),
            &settings.inlay_hints,
        )))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        let args = params.arguments;
        match params.command.as_str() {
            CMD_SWITCH_VERSION => {
                let version = string_arg(&args, 0)
                    .ok_or_else(|| Error::invalid_params("expected a version argument"))?;
                self.switch_version(&version)
                    .await
                    .map_err(|e| Error::invalid_params(e.to_string()))?;
                Ok(Some(json!({ "version": version })))
            }
            CMD_DETECT_SYSTEM_VERSION => {
                let detected = self.detect_system_version().await;
                match &detected {
                    Some(version) => {
                        self.log(
                            MessageType::INFO,
                            format!("Detected Octopus {} from the system", version),
                        )
                        .await
                    }
                    None => {
                        self.client
                            .show_message(
                                MessageType::WARNING,
                                "Could not detect Octopus version from system",
                            )
                            .await
                    }
                }
                Ok(Some(json!({ "detected": detected })))
            }
            CMD_AUTO_DETECT_VERSION => {
                let active = string_arg(&args, 0).and_then(|s| Url::parse(&s).ok());
                Ok(Some(self.auto_detect_version(active.as_ref()).await))
            }
            CMD_TOGGLE_INLAY_HINTS => {
                let enabled = self.toggle_inlay_hints().await;
                Ok(Some(json!({ "enabled": enabled })))
            }
            CMD_SHOW_VARIABLES => Ok(Some(self.variable_list())),
            other => Err(Error::invalid_params(format!("unknown command: {}", other))),
        }
    }
}

/// Run the LSP server on stdin/stdout
pub async fn run_lsp_server() {
    crate::logging::init_tracing("octopus_tools=info");
    info!("Starting Octopus language server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(OctopusLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
