use sqlx::PgConnection;

/// A borrowed handle to a live database connection, either straight from the pool or
/// inside of an open transaction
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Provides access to the systems the application talks to. Driven adapters pull their
/// connections from here so business logic never has to know where they came from.
pub trait ExternalConnectivity: Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle + Send
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// An [ExternalConnectivity] whose database work happens in a transaction which must be committed
pub trait TransactionHandle: ExternalConnectivity {
    async fn commit(self) -> Result<(), anyhow::Error>;
}

/// An [ExternalConnectivity] which is able to open a database transaction
pub trait Transactable: ExternalConnectivity {
    type Handle: TransactionHandle + Send;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}
