pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    department TEXT NOT NULL,
    start_date TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1,
    is_latest INTEGER NOT NULL DEFAULT 1,
    status TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    start_date TEXT NOT NULL,
    impact TEXT NOT NULL CHECK (impact IN ('low', 'medium', 'high')),
    likelihood TEXT NOT NULL CHECK (likelihood IN ('low', 'medium', 'high')),
    overall_risk INTEGER NOT NULL CHECK (overall_risk BETWEEN 2 AND 6),
    recommendation TEXT,
    status TEXT NOT NULL CHECK (status IN ('open', 'closed'))
);

CREATE TABLE IF NOT EXISTS schedule_scope (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
    task TEXT NOT NULL,
    target_date TEXT NOT NULL,
    completion_percent REAL NOT NULL DEFAULT 0
        CHECK (completion_percent >= 0 AND completion_percent <= 100),
    notes TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS financials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL UNIQUE REFERENCES reports(id) ON DELETE CASCADE,
    original_contract_amt REAL NOT NULL CHECK (original_contract_amt >= 0),
    paid_to_date REAL NOT NULL CHECK (paid_to_date >= 0)
);

CREATE TABLE IF NOT EXISTS appendix (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL UNIQUE REFERENCES reports(id) ON DELETE CASCADE,
    content TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS report_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
    snapshot_data TEXT NOT NULL,
    schema_version INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'approved', 'denied')),
    approved_at TEXT,
    signature_name TEXT,
    signature_method TEXT CHECK (signature_method IS NULL OR signature_method IN ('draw', 'upload')),
    signature_url TEXT,
    CHECK ((status = 'approved') = (
        approved_at IS NOT NULL
        AND signature_name IS NOT NULL
        AND signature_method IS NOT NULL
        AND signature_url IS NOT NULL
    ))
);

CREATE TRIGGER IF NOT EXISTS report_snapshots_frozen
BEFORE UPDATE OF report_id, snapshot_data, schema_version, created_at ON report_snapshots
BEGIN
    SELECT RAISE(ABORT, 'snapshot payload is immutable');
END;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL DEFAULT 'vendor' CHECK (role IN ('public', 'vendor', 'admin')),
    api_token TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_issues_report ON issues(report_id);
CREATE INDEX IF NOT EXISTS idx_schedule_report ON schedule_scope(report_id);
CREATE INDEX IF NOT EXISTS idx_snapshots_report_status ON report_snapshots(report_id, status);
CREATE INDEX IF NOT EXISTS idx_snapshots_created ON report_snapshots(created_at);
";
