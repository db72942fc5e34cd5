use super::Connection;

/// Closes a connection when dropped, unless [`disarm`](CloseGuard::disarm)ed.
///
/// Drivers hold one across the execution in
/// [`Connection::execute_reader`] when `Behavior::close_connection` is set.
/// An execution that fails, or whose future is dropped before the reader
/// exists, then still closes the connection.
pub struct CloseGuard<'c, C: Connection + ?Sized> {
    conn: Option<&'c mut C>,
    armed: bool,
}

impl<'c, C: Connection + ?Sized> CloseGuard<'c, C> {
    pub fn new(conn: &'c mut C, armed: bool) -> CloseGuard<'c, C> {
        CloseGuard {
            conn: Some(conn),
            armed,
        }
    }

    pub fn connection(&mut self) -> &mut C {
        match self.conn.as_deref_mut() {
            Some(conn) => conn,
            None => unreachable!("close guard used after disarm"),
        }
    }

    /// Hands the connection back. Closing becomes the caller's job, usually
    /// the reader's.
    pub fn disarm(mut self) -> &'c mut C {
        self.armed = false;

        match self.conn.take() {
            Some(conn) => conn,
            None => unreachable!("close guard disarmed twice"),
        }
    }
}

impl<C: Connection + ?Sized> Drop for CloseGuard<'_, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        if let Some(conn) = self.conn.as_deref_mut() {
            // The execution error, or the cancellation, is what the caller
            // sees.
            let _ = conn.close();
        }
    }
}

impl<C: Connection + ?Sized> std::fmt::Debug for CloseGuard<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseGuard")
            .field("armed", &self.armed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        async_trait,
        driver::{Behavior, Command, ConnectionState, Reader},
        Result, Value,
    };

    #[derive(Debug, Default)]
    struct Counting {
        closes: usize,
    }

    #[async_trait]
    impl Connection for Counting {
        fn state(&self) -> ConnectionState {
            ConnectionState::Open
        }

        async fn open(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.closes += 1;
            Ok(())
        }

        async fn execute_non_query(&mut self, _: &mut Command) -> Result<u64> {
            Ok(0)
        }

        async fn execute_scalar(&mut self, _: &mut Command) -> Result<Value> {
            Ok(Value::Null)
        }

        async fn execute_reader<'c>(
            &'c mut self,
            _: &mut Command,
            _: Behavior,
        ) -> Result<Box<dyn Reader + 'c>> {
            crate::bail!("not supported")
        }
    }

    #[test]
    fn closes_when_dropped_armed() {
        let mut conn = Counting::default();
        drop(CloseGuard::new(&mut conn, true));
        assert_eq!(conn.closes, 1);

        drop(CloseGuard::new(&mut conn, false));
        assert_eq!(conn.closes, 1);
    }

    #[test]
    fn disarm_keeps_connection_open() {
        let mut conn = Counting::default();
        let guard = CloseGuard::new(&mut conn, true);
        let conn = guard.disarm();
        assert_eq!(conn.closes, 0);
    }
}
