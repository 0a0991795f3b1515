use crate::gradio::{InferenceClient, TextTo3dRequest};
use crate::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Runs one generation through `client` and moves the artifact it returns
/// to `destination`.
///
/// The destination's parent directory must already exist. Nothing is
/// retried: the first failure is returned and later steps are skipped.
pub async fn fetch_model(
    client: &dyn InferenceClient,
    request: &TextTo3dRequest,
    destination: &Path,
) -> Result<PathBuf> {
    let artifact = client.submit(request).await?;

    println!("{}", artifact.display());
    info!("Remote call returned {}", artifact.display());

    move_file(&artifact, destination).await?;

    info!("Model stored at {}", destination.display());
    Ok(destination.to_path_buf())
}

/// Moves `source` to `destination`, replacing an existing file.
///
/// Falls back to [`copy_into_place`] when the two paths are on different
/// filesystems.
pub async fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if tokio::fs::metadata(source).await.is_err() {
        return Err(Error::ArtifactNotFound {
            path: source.to_path_buf(),
        });
    }

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    match tokio::fs::metadata(&dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(Error::DestinationDirMissing { dir }),
    }

    match tokio::fs::rename(source, destination).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(
                "Rename across filesystems, copying {} to {}",
                source.display(),
                destination.display()
            );
            copy_into_place(source, destination, &dir).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Copies `source` to a staging file in `dir`, renames it over
/// `destination`, then removes `source`.
///
/// A failed copy or rename removes the staging file and leaves `destination`
/// untouched. If only the final removal fails, `destination` already holds
/// the complete artifact and the error is still returned, with `source`
/// left in place.
pub async fn copy_into_place(source: &Path, destination: &Path, dir: &Path) -> Result<()> {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());
    let staging = dir.join(format!(".{}.partial", name));

    let staged = match tokio::fs::copy(source, &staging).await {
        Ok(_) => tokio::fs::rename(&staging, destination).await,
        Err(e) => Err(e),
    };
    if let Err(e) = staged {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }

    if let Err(e) = tokio::fs::remove_file(source).await {
        warn!(
            "Stored {} but could not remove {}: {}",
            destination.display(),
            source.display(),
            e
        );
        return Err(e.into());
    }

    Ok(())
}
