//! HTTP client for the running node's REST API.
//!
//! All routes live under `http://localhost:<apiPort>/api/codex/v1`. The port is
//! passed per call because the operator can change it between launches.

use crate::error::ApiError;
use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

const API_PREFIX: &str = "api/codex/v1";
const NODE_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Response of `GET /debug/info`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DebugInfo {
    pub id: String,
    pub spr: String,
    pub announce_addresses: Vec<String>,
    pub table: RoutingTable,
    pub codex: NodeVersion,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingTable {
    pub local_node: LocalNode,
    pub nodes: Vec<PeerNode>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalNode {
    pub node_id: String,
    pub peer_id: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PeerNode {
    pub peer_id: String,
    pub address: String,
    pub seen: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NodeVersion {
    pub version: String,
    pub revision: String,
}

impl DebugInfo {
    pub fn peer_count(&self) -> usize {
        self.table.nodes.len()
    }

    /// Online and discoverable once more than two peers are known.
    pub fn is_well_connected(&self) -> bool {
        self.peer_count() > 2
    }

    /// Public IP and port from the first announce multiaddr
    /// (`/ip4/<ip>/tcp/<port>`).
    pub fn announced_ip_and_port(&self) -> Option<(&str, &str)> {
        let first = self.announce_addresses.first()?;
        let parts = first.split('/').collect::<Vec<_>>();
        Some((parts.get(2).copied()?, parts.get(4).copied()?))
    }
}

/// Manifest metadata of a stored dataset.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Manifest {
    pub filename: Option<String>,
    pub mimetype: Option<String>,
    pub dataset_size: u64,
    pub protected: bool,
}

/// One dataset entry, as returned by manifest and listing routes.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataEntry {
    pub cid: String,
    pub manifest: Manifest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DataList {
    content: Vec<DataEntry>,
}

/// Operations the menus perform against a running node.
#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn debug_info(&self, api_port: u16) -> Result<DebugInfo, ApiError>;
    /// Upload a local file; returns the CID.
    async fn upload(&self, api_port: u16, file: &Path) -> Result<String, ApiError>;
    /// Download `cid` into `dest_dir`; returns the written file path.
    async fn download(&self, api_port: u16, cid: &str, dest_dir: &Path)
        -> Result<PathBuf, ApiError>;
    async fn list_data(&self, api_port: u16) -> Result<Vec<DataEntry>, ApiError>;
}

/// `NodeApi` over `reqwest`.
pub struct NodeApiClient {
    http: reqwest::Client,
}

impl NodeApiClient {
    pub fn new() -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(NODE_HTTP_CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = check_status(self.http.get(url).send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl NodeApi for NodeApiClient {
    async fn debug_info(&self, api_port: u16) -> Result<DebugInfo, ApiError> {
        self.get_json(&endpoint(api_port, "debug/info")).await
    }

    async fn upload(&self, api_port: u16, file: &Path) -> Result<String, ApiError> {
        let body = tokio::fs::read(file).await?;
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        debug!(file = %file.display(), bytes = body.len(), "uploading");

        let response = self
            .http
            .post(endpoint(api_port, "data"))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header(
                reqwest::header::CONTENT_DISPOSITION,
                content_disposition(&filename),
            )
            .body(body)
            .send()
            .await?;
        let cid = check_status(response).await?.text().await?;
        info!(cid = cid.trim(), "upload complete");
        Ok(cid.trim().to_string())
    }

    async fn download(
        &self,
        api_port: u16,
        cid: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let entry: DataEntry = self
            .get_json(&endpoint(api_port, &format!("data/{cid}/network/manifest")))
            .await?;
        let target = dest_dir.join(download_filename(entry.manifest.filename.as_deref()));

        let mut response = check_status(
            self.http
                .get(endpoint(api_port, &format!("data/{cid}/network/stream")))
                .send()
                .await?,
        )
        .await?;

        // Stream into a sibling and rename, so a broken transfer never
        // replaces or impersonates a complete file.
        let partial = partial_path(&target);
        if let Err(err) = stream_to_file(&mut response, &partial).await {
            warn!(cid, %err, "download interrupted");
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err);
        }
        tokio::fs::rename(&partial, &target).await?;
        info!(cid, path = %target.display(), "download complete");
        Ok(target)
    }

    async fn list_data(&self, api_port: u16) -> Result<Vec<DataEntry>, ApiError> {
        let list: DataList = self.get_json(&endpoint(api_port, "data")).await?;
        Ok(list.content)
    }
}

async fn stream_to_file(response: &mut reqwest::Response, path: &Path) -> Result<(), ApiError> {
    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

/// `<name>.part` next to `target`.
fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

fn endpoint(api_port: u16, route: &str) -> String {
    format!("http://localhost:{api_port}/{API_PREFIX}/{route}")
}

fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', "'"))
}

/// Local file name for a download. Manifest names are reduced to their last
/// path component; missing names get a random `unknown_` name.
fn download_filename(manifest_name: Option<&str>) -> String {
    manifest_name
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("unknown_{}", rand::thread_rng().gen::<u32>()))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status(status.as_u16(), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    const DEBUG_INFO: &str = r#"{
        "id": "16Uiu2",
        "addrs": ["/ip4/0.0.0.0/tcp/8070"],
        "spr": "spr:abc",
        "announceAddresses": ["/ip4/1.2.3.4/tcp/8070"],
        "table": {
            "localNode": {"nodeId": "n1", "peerId": "p1", "record": "r", "address": "1.2.3.4:8090", "seen": true},
            "nodes": [
                {"nodeId": "a", "peerId": "pa", "record": "r", "address": "5.5.5.5:8090", "seen": true},
                {"nodeId": "b", "peerId": "pb", "record": "r", "address": "6.6.6.6:8090", "seen": false},
                {"nodeId": "c", "peerId": "pc", "record": "r", "address": "7.7.7.7:8090", "seen": true}
            ]
        },
        "codex": {"version": "v0.1.9", "revision": "abcd"}
    }"#;

    #[test]
    fn parses_debug_info_and_derives_status() {
        let info: DebugInfo = serde_json::from_str(DEBUG_INFO).unwrap();
        assert_eq!(info.table.local_node.peer_id, "p1");
        assert_eq!(info.peer_count(), 3);
        assert!(info.is_well_connected());
        assert_eq!(info.announced_ip_and_port(), Some(("1.2.3.4", "8070")));
        assert_eq!(info.codex.version, "v0.1.9");
    }

    #[test]
    fn two_peers_is_not_well_connected() {
        let mut info: DebugInfo = serde_json::from_str(DEBUG_INFO).unwrap();
        info.table.nodes.truncate(2);
        assert!(!info.is_well_connected());
    }

    #[test]
    fn parses_data_listing() {
        let raw = r#"{"content":[{"cid":"zDv1","manifest":{"filename":"a.txt","mimetype":"text/plain","datasetSize":12,"protected":false}}]}"#;
        let list: DataList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.content.len(), 1);
        assert_eq!(list.content[0].manifest.filename.as_deref(), Some("a.txt"));
        assert_eq!(list.content[0].manifest.dataset_size, 12);
    }

    #[test]
    fn endpoint_uses_api_prefix() {
        assert_eq!(
            endpoint(8080, "debug/info"),
            "http://localhost:8080/api/codex/v1/debug/info"
        );
    }

    #[test]
    fn download_filename_strips_directories() {
        assert_eq!(download_filename(Some("../../etc/passwd")), "passwd");
        assert_eq!(download_filename(Some("photo.png")), "photo.png");
        assert!(download_filename(None).starts_with("unknown_"));
        assert!(download_filename(Some("")).starts_with("unknown_"));
    }

    #[test]
    fn partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("/d/photo.png")),
            PathBuf::from("/d/photo.png.part")
        );
    }

    /// Serve the manifest route, then `body` under a declared length of
    /// `declared_len`. A shorter body ends the connection mid-transfer.
    async fn serve_download(manifest: &'static str, declared_len: usize, body: &'static [u8]) -> u16 {
        use tokio::io::AsyncReadExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&head);
                let (len, payload) = if request.contains("/network/manifest") {
                    (manifest.len(), manifest.as_bytes())
                } else {
                    (declared_len, body)
                };
                let header = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n"
                );
                let _ = socket.write_all(header.as_bytes()).await;
                let _ = socket.write_all(payload).await;
                let _ = socket.shutdown().await;
            }
        });
        port
    }

    const MANIFEST: &str = r#"{"cid":"zDv1","manifest":{"filename":"a.bin"}}"#;

    #[tokio::test]
    async fn download_writes_manifest_named_file() {
        let dir = TestTempDir::new("node-download");
        let port = serve_download(MANIFEST, 11, b"hello world").await;

        let written = NodeApiClient::new()
            .unwrap()
            .download(port, "zDv1", dir.path())
            .await
            .unwrap();
        assert_eq!(written, dir.child("a.bin"));
        assert_eq!(std::fs::read(&written).unwrap(), b"hello world");
        assert!(!dir.child("a.bin.part").exists());
    }

    #[tokio::test]
    async fn interrupted_download_leaves_existing_file_alone() {
        let dir = TestTempDir::new("node-download-cut");
        dir.write_text("a.bin", "older complete copy");
        let port = serve_download(MANIFEST, 100, b"0123456789").await;

        let result = NodeApiClient::new()
            .unwrap()
            .download(port, "zDv1", dir.path())
            .await;
        assert!(result.is_err());
        assert_eq!(
            std::fs::read_to_string(dir.child("a.bin")).unwrap(),
            "older complete copy"
        );
        assert!(!dir.child("a.bin.part").exists());
    }

    #[test]
    fn content_disposition_quotes_filename() {
        assert_eq!(
            content_disposition("a \"b\".txt"),
            "attachment; filename=\"a 'b'.txt\""
        );
    }
}
