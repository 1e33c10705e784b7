#[derive(Debug, Clone)]
pub enum Message {
    // === CONNECTION MESSAGES ===
    ConnectingTo(String), // store description
    ConnectionCloseFailed(String, String), // store description, error

    // === BACKUP MESSAGES ===
    BackupCreated(String),                  // backup path
    BackupSkippedNetworked(String),         // store description
    BackupFailedContinuing(String, String), // source path, error
    BackupRequiredHint,

    // === CONFIRMATION MESSAGES ===
    ConfirmClear(Vec<String>, String),          // tables, store
    ConfirmResetSequences(Vec<String>, String), // tables, store
    OperationCancelled,

    // === REPORT MESSAGES ===
    DeletionsHeader,
    SequenceResetsHeader,
    StatementsHeader(String), // script name
    VerificationHeader,
    AllOperationsSucceeded(usize),
    PartialSuccess {
        succeeded: usize,
        skipped: usize,
        failed: usize,
    },
    StrictModeFailure(usize), // failed count

    // === SCRIPT MESSAGES ===
    ScriptLoaded(String, usize), // script name, statement count
    ScriptEmpty(String),
    ScriptReadFailed(String),
    RunRecorded(i64),
    RunRecordFailed(String),

    // === VERIFICATION MESSAGES ===
    SampleHeader(String, usize), // table, limit
    SampleEmpty(String),
    VerificationFailed(String, String), // table, error

    // === INSPECTION MESSAGES ===
    TablesHeader(String), // store description
    NoTablesFound,
    HistoryHeader,
    HistoryEmpty,

    // === ERROR MESSAGES ===
    RunAborted(String),
}
