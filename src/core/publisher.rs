use crate::utils::{qualified_remote_path, remote_file_name};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("cannot resolve FTP host {0}")]
    Address(String),
    #[error("FTP error: {0}")]
    Ftp(#[from] FtpError),
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Makes the rendered document available at its destination.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload `local` and return where it was stored.
    async fn publish(&self, local: &Path) -> Result<String, PublishError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtpSettings {
    pub host: String,
    #[serde(default = "default_ftp_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Remote directory the document is stored in.
    #[serde(default)]
    pub path: String,
}

fn default_ftp_port() -> u16 {
    21
}

pub struct FtpPublisher {
    settings: FtpSettings,
    timeout: Duration,
}

impl FtpPublisher {
    pub fn new(settings: FtpSettings, timeout: Duration) -> Self {
        Self { settings, timeout }
    }

    fn upload(settings: &FtpSettings, timeout: Duration, local: &Path) -> Result<String, PublishError> {
        let addr = (settings.host.as_str(), settings.port)
            .to_socket_addrs()
            .map_err(|_| PublishError::Address(settings.host.clone()))?
            .next()
            .ok_or_else(|| PublishError::Address(settings.host.clone()))?;

        debug!("Connecting to FTP server {}", addr);
        let mut ftp = FtpStream::connect_timeout(addr, timeout)?
            .passive_stream_builder(move |addr| data_stream(&addr, timeout));
        set_timeouts(ftp.get_ref(), timeout)?;
        ftp.login(settings.user.as_str(), settings.password.as_str())?;
        ftp.transfer_type(FileType::Binary)?;

        let file_name = remote_file_name(local);
        let open = || {
            File::open(local).map_err(|source| PublishError::Io {
                path: local.to_path_buf(),
                source,
            })
        };

        let direct = match ftp.cwd(settings.path.as_str()) {
            Ok(()) => ftp.put_file(file_name.as_str(), &mut open()?).map(|_| ()),
            Err(err) => Err(err),
        };

        let target = qualified_remote_path(&settings.path, &file_name);
        match direct {
            Ok(()) => {}
            Err(err) if is_permission_failure(&err) => {
                warn!("Storing into {} refused ({}), storing to {} instead", settings.path, err, target);
                ftp.put_file(target.as_str(), &mut open()?)?;
            }
            Err(err) => return Err(err.into()),
        }

        if let Err(err) = ftp.quit() {
            debug!("FTP quit failed: {}", err);
        }
        Ok(target)
    }
}

/// A permanent (5xx) reply to `CWD` or `STOR`; only these trigger the
/// upload to the fully-qualified path.
fn is_permission_failure(err: &FtpError) -> bool {
    match err {
        FtpError::UnexpectedResponse(response) => (500..600).contains(&response.status.code()),
        _ => false,
    }
}

fn set_timeouts(stream: &TcpStream, timeout: Duration) -> Result<(), FtpError> {
    stream
        .set_read_timeout(Some(timeout))
        .and_then(|()| stream.set_write_timeout(Some(timeout)))
        .map_err(FtpError::ConnectionError)
}

fn data_stream(addr: &SocketAddr, timeout: Duration) -> Result<TcpStream, FtpError> {
    let stream = TcpStream::connect_timeout(addr, timeout).map_err(FtpError::ConnectionError)?;
    set_timeouts(&stream, timeout)?;
    Ok(stream)
}

#[async_trait]
impl Publisher for FtpPublisher {
    async fn publish(&self, local: &Path) -> Result<String, PublishError> {
        info!("Uploading {} to {}", local.display(), self.settings.host);
        let settings = self.settings.clone();
        let timeout = self.timeout;
        let local = local.to_path_buf();

        tokio::task::spawn_blocking(move || Self::upload(&settings, timeout, &local)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// Commands seen and files stored by [`fake_ftp`].
    #[derive(Default)]
    struct Session {
        commands: Vec<String>,
        stored: Vec<(String, Vec<u8>)>,
    }

    /// Single-connection FTP server on localhost. `refuse` may answer a
    /// command with a canned failure reply instead of the normal one.
    fn fake_ftp(refuse: fn(&str) -> Option<&'static str>) -> (SocketAddr, Arc<Mutex<Session>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let session = Arc::new(Mutex::new(Session::default()));
        let log = session.clone();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;
            let mut data_listener: Option<TcpListener> = None;
            writer.write_all(b"220 ready\r\n").unwrap();

            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                let command = line.trim_end().to_string();
                log.lock().unwrap().commands.push(command.clone());

                if let Some(reply) = refuse(&command) {
                    writer.write_all(format!("{}\r\n", reply).as_bytes()).unwrap();
                    continue;
                }

                let (verb, arg) = command.split_once(' ').unwrap_or((command.as_str(), ""));
                let reply = match verb {
                    "USER" => "331 password please".to_string(),
                    "PASS" => "230 logged in".to_string(),
                    "TYPE" => "200 type set".to_string(),
                    "CWD" => "250 directory changed".to_string(),
                    "PASV" => {
                        let data = TcpListener::bind("127.0.0.1:0").unwrap();
                        let port = data.local_addr().unwrap().port();
                        data_listener = Some(data);
                        format!("227 Entering Passive Mode (127,0,0,1,{},{})", port / 256, port % 256)
                    }
                    "STOR" => {
                        writer.write_all(b"150 send it\r\n").unwrap();
                        let (mut data, _) = data_listener.take().unwrap().accept().unwrap();
                        let mut body = Vec::new();
                        data.read_to_end(&mut body).unwrap();
                        log.lock().unwrap().stored.push((arg.to_string(), body));
                        "226 transfer complete".to_string()
                    }
                    "QUIT" => {
                        writer.write_all(b"221 bye\r\n").unwrap();
                        break;
                    }
                    _ => "502 not implemented".to_string(),
                };
                writer.write_all(format!("{}\r\n", reply).as_bytes()).unwrap();
            }
        });

        (addr, session)
    }

    fn upload_to(addr: SocketAddr) -> (tempfile::TempDir, Result<String, PublishError>) {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("index.html");
        std::fs::write(&local, "<html></html>").unwrap();

        let settings = FtpSettings {
            host: addr.ip().to_string(),
            port: addr.port(),
            user: "u".to_string(),
            password: "p".to_string(),
            path: "/public_html/".to_string(),
        };
        let result = FtpPublisher::upload(&settings, Duration::from_secs(5), &local);
        (dir, result)
    }

    #[test]
    fn test_upload_into_directory() {
        let (addr, session) = fake_ftp(|_| None);
        let (_dir, result) = upload_to(addr);

        assert_eq!(result.unwrap(), "/public_html/index.html");
        let session = session.lock().unwrap();
        assert_eq!(session.stored, vec![("index.html".to_string(), b"<html></html>".to_vec())]);
        assert!(session.commands.contains(&"CWD /public_html/".to_string()));
    }

    #[test]
    fn test_refused_cwd_stores_qualified_path() {
        let (addr, session) = fake_ftp(|command| command.starts_with("CWD").then_some("550 no such directory"));
        let (_dir, result) = upload_to(addr);

        assert_eq!(result.unwrap(), "/public_html/index.html");
        let session = session.lock().unwrap();
        assert_eq!(session.stored.len(), 1);
        assert_eq!(session.stored[0].0, "/public_html/index.html");
    }

    #[test]
    fn test_refused_stor_stores_qualified_path() {
        let (addr, session) = fake_ftp(|command| (command == "STOR index.html").then_some("553 not allowed"));
        let (_dir, result) = upload_to(addr);

        assert_eq!(result.unwrap(), "/public_html/index.html");
        let session = session.lock().unwrap();
        let stors: Vec<&String> = session.commands.iter().filter(|c| c.starts_with("STOR")).collect();
        assert_eq!(stors, vec!["STOR index.html", "STOR /public_html/index.html"]);
        assert_eq!(session.stored[0].0, "/public_html/index.html");
    }

    #[test]
    fn test_transient_reply_does_not_fall_back() {
        let (addr, session) = fake_ftp(|command| command.starts_with("STOR").then_some("450 busy, try later"));
        let (_dir, result) = upload_to(addr);

        assert!(matches!(result, Err(PublishError::Ftp(_))));
        let session = session.lock().unwrap();
        let stors = session.commands.iter().filter(|c| c.starts_with("STOR")).count();
        assert_eq!(stors, 1);
        assert!(session.stored.is_empty());
    }

    #[test]
    fn test_settings_defaults() {
        let settings: FtpSettings = toml::from_str(
            r#"
            host = "ftp.example.com"
            user = "gallery"
            password = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(settings.port, 21);
        assert_eq!(settings.path, "");
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("index.html");
        std::fs::write(&local, "<html></html>").unwrap();

        let publisher = FtpPublisher::new(
            FtpSettings {
                host: "host.invalid".to_string(),
                port: 21,
                user: "u".to_string(),
                password: "p".to_string(),
                path: "/".to_string(),
            },
            Duration::from_secs(2),
        );

        assert!(publisher.publish(&local).await.is_err());
    }
}
