use crate::Result;

use quarry_core::{Connection, ConnectionState};

use tracing::{debug, warn};

/// Opens a connection if it was closed and closes it again on every exit
/// path.
///
/// [`finish`](ConnectionScope::finish) closes and reports the close error.
/// Dropping the scope instead (early return, error, cancellation) closes
/// and only logs a failure, so the original error is the one returned.
pub(crate) struct ConnectionScope<'a> {
    conn: Option<&'a mut dyn Connection>,
    opened: bool,
}

impl<'a> ConnectionScope<'a> {
    pub(crate) async fn open(conn: &'a mut dyn Connection) -> Result<ConnectionScope<'a>> {
        let opened = conn.state() == ConnectionState::Closed;

        if opened {
            conn.open().await?;
            debug!("opened connection");
        }

        Ok(ConnectionScope {
            conn: Some(conn),
            opened,
        })
    }

    pub(crate) fn connection(&mut self) -> &mut dyn Connection {
        match &mut self.conn {
            Some(conn) => &mut **conn,
            None => unreachable!("connection scope used after release"),
        }
    }

    /// Gives up ownership of the connection, returning whether this scope
    /// opened it. The caller becomes responsible for closing it.
    pub(crate) fn release(mut self) -> (&'a mut dyn Connection, bool) {
        let opened = std::mem::replace(&mut self.opened, false);

        match self.conn.take() {
            Some(conn) => (conn, opened),
            None => unreachable!("connection scope released twice"),
        }
    }

    /// Closes the connection if this scope opened it.
    pub(crate) fn finish(mut self) -> Result<()> {
        self.close()
    }

    fn close(&mut self) -> Result<()> {
        if !std::mem::replace(&mut self.opened, false) {
            return Ok(());
        }

        if let Some(conn) = self.conn.as_mut() {
            conn.close()?;
            debug!("closed connection");
        }
        Ok(())
    }
}

impl Drop for ConnectionScope<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(%err, "failed to close connection");
        }
    }
}
