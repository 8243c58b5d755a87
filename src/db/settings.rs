use std::fmt;

/// Where and as whom to connect. Fixed once handed to a holder.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<String>,
}

impl ConnectionSettings {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            database: None,
            port: None,
            socket: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }

    /// Password-free description of the target, e.g. `app@db:3307/timecard`.
    pub fn target(&self) -> String {
        let mut target = match &self.socket {
            Some(socket) => format!("{}@{}", self.username, socket),
            None => format!("{}@{}", self.username, self.host),
        };
        if let (None, Some(port)) = (&self.socket, self.port) {
            target.push_str(&format!(":{}", port));
        }
        if let Some(database) = &self.database {
            target.push('/');
            target.push_str(database);
        }
        target
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .field("socket", &self.socket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password() {
        let settings = ConnectionSettings::new("localhost", "root", "s3cret");
        let debug = format!("{:?}", settings);

        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("localhost"));
    }

    #[test]
    fn target_with_port_and_database() {
        let settings = ConnectionSettings::new("db", "app", "pw")
            .with_port(3307)
            .with_database("timecard");
        assert_eq!(settings.target(), "app@db:3307/timecard");
    }

    #[test]
    fn target_prefers_socket_over_host() {
        let settings = ConnectionSettings::new("localhost", "root", "")
            .with_port(3306)
            .with_socket("/tmp/mysql.sock");
        assert_eq!(settings.target(), "root@/tmp/mysql.sock");
    }

    #[test]
    fn target_host_only() {
        assert_eq!(
            ConnectionSettings::new("localhost", "root", "").target(),
            "root@localhost"
        );
    }
}
