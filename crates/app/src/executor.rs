use folio_application::{Command, CommandSink, Msg};
use folio_client::ApiClient;
use folio_storage::Storage;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Runs [`Command`]s for the UI. Network work is spawned on the runtime and
/// reported back as [`Msg`]s; the theme is written in place.
pub struct Executor {
    runtime: Handle,
    client: ApiClient,
    storage: Storage,
    tx: UnboundedSender<Msg>,
}

impl Executor {
    pub fn new(
        runtime: Handle,
        client: ApiClient,
        storage: Storage,
        tx: UnboundedSender<Msg>,
    ) -> Self {
        Self {
            runtime,
            client,
            storage,
            tx,
        }
    }

    fn spawn<F>(&self, work: F)
    where
        F: std::future::Future<Output = Msg> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            post(&tx, work.await);
        });
    }
}

/// Sends `msg` to the UI. Returns false once the UI has gone away.
fn post(tx: &UnboundedSender<Msg>, msg: Msg) -> bool {
    match tx.send(msg) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(msg = ?err.0, "ui gone; dropping message");
            false
        }
    }
}

impl CommandSink for Executor {
    fn dispatch(&mut self, command: Command) {
        let client = self.client.clone();
        match command {
            Command::FetchLibrary => self.spawn(async move {
                Msg::LibraryLoaded(client.list_books().await.map_err(|err| err.user_message()))
            }),
            Command::CheckHealth => self.spawn(async move {
                Msg::HealthChecked(client.health().await.map_err(|err| err.user_message()))
            }),
            Command::Search {
                generation,
                book,
                top_words,
                k,
            } => {
                tracing::info!(%book, generation, "search");
                self.spawn(async move {
                    let result = client
                        .search(&book, top_words, k)
                        .await
                        .map_err(|err| err.user_message());
                    Msg::SearchFinished { generation, result }
                })
            }
            Command::ReadBook { generation, book } => {
                tracing::info!(%book, generation, "open book");
                self.spawn(async move {
                    let result = client.read_book(&book).await.map_err(|err| err.user_message());
                    Msg::ReaderLoaded { generation, result }
                })
            }
            Command::PersistTheme(theme) => {
                if let Err(err) = self.storage.save_theme(theme) {
                    tracing::warn!(?err, %theme, "persist theme failed");
                    post(
                        &self.tx,
                        Msg::Notice(format!("could not save theme: {err:#}")),
                    );
                }
            }
        }
    }
}
