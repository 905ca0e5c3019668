//! # Hot Reload Module
//!
//! Watches a host description file and swaps the generator's host table when
//! it changes, so documentation follows route and controller edits without a
//! restart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use odata_swagger::hot_reload::watch_host;
//! use std::sync::Arc;
//!
//! let generator = Arc::new(DocumentGenerator::new(options, host, conventional));
//! let watcher = watch_host("host.yaml", Arc::clone(&generator), |host| {
//!     println!("Reloaded {} routes", host.routes.len());
//! })?;
//!
//! // Keep the watcher alive for as long as reloads are wanted
//! ```
//!
//! ## Reload Process
//!
//! 1. **Detection** - the filesystem watcher reports a modify or create event
//! 2. **Parse** - the host file and the model files it names are loaded
//! 3. **Swap** - [`DocumentGenerator::replace_host`] installs the new host and
//!    invalidates cached documents
//! 4. **Hook** - the callback sees the host now in effect
//!
//! ## Error Handling
//!
//! A host file that fails to load is logged and ignored; the previous host
//! stays in effect.

use crate::generator::DocumentGenerator;
use crate::host::{load_host, HostDescription};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Watch `host_path` and replace the generator's host when it changes.
///
/// The callback receives the host that was just installed.
///
/// # Errors
///
/// Fails when the watcher cannot be created or the path cannot be watched.
pub fn watch_host<P, F>(
    host_path: P,
    generator: Arc<DocumentGenerator>,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&HostDescription) + Send + 'static,
{
    let path: PathBuf = host_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match load_host(&watch_path) {
                        Ok(host) => {
                            info!(
                                path = %watch_path.display(),
                                routes = host.routes.len(),
                                controllers = host.controllers.len(),
                                "hot-reload: applying host update"
                            );
                            generator.replace_host(host);
                            on_reload(&generator.host());
                        }
                        Err(e) => {
                            warn!(path = %watch_path.display(), error = %format!("{e:#}"), "hot-reload: host file rejected");
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
