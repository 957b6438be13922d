use std::sync::Arc;

use common::adapter::{logger_from_env, FlockRunLock, StdClock, StdEnvResolver, StdFileSystem};
use common::journal::EventJournal;
use common::ports::outbound::{EnvResolver, FileSystem, Log};

pub struct App {
    pub env_resolver: Arc<dyn EnvResolver>,
    pub journal: EventJournal,
    pub logger: Arc<dyn Log>,
}

pub fn wire_journal_check() -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger = logger_from_env(env_resolver.as_ref(), Arc::clone(&fs));
    App {
        journal: EventJournal::new(
            fs,
            Arc::new(StdClock),
            Arc::new(FlockRunLock),
            Arc::clone(&logger),
        ),
        env_resolver,
        logger,
    }
}
