use crate::args::LedgerCommand;
use certchain::domain::{CredentialId, CredentialRecord, Principal};
use certchain::storage::KeyValueStore;
use certchain::{Ledger, LedgerError};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

/// What a command prints on stdout. State changes without a result report `true`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Ok { value: Value },
    Err { error: u16, message: String },
}

impl Response {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl From<Result<Value, LedgerError>> for Response {
    fn from(result: Result<Value, LedgerError>) -> Self {
        match result {
            Ok(value) => Self::Ok { value },
            Err(err) => Self::Err { error: err.code(), message: err.to_string() },
        }
    }
}

/// Runs one command against `ledger`.
pub fn execute<S: KeyValueStore>(ledger: &mut Ledger<S>, command: LedgerCommand) -> Response {
    debug!(?command, "Executing command");
    dispatch(ledger, command).into()
}

fn dispatch<S: KeyValueStore>(
    ledger: &mut Ledger<S>,
    command: LedgerCommand,
) -> Result<Value, LedgerError> {
    let value = match command {
        LedgerCommand::AddInstitution { caller, institution } => {
            ledger.add_institution(&caller.into(), &institution.into())?;
            Value::Bool(true)
        },
        LedgerCommand::RemoveInstitution { caller, institution } => {
            ledger.remove_institution(&caller.into(), &institution.into())?;
            Value::Bool(true)
        },
        LedgerCommand::IsVerified { institution } => {
            json!(ledger.is_verified_institution(&Principal::from(institution)))
        },
        LedgerCommand::TransferAdmin { caller, new_admin } => {
            ledger.transfer_admin(&caller.into(), &new_admin.into())?;
            Value::Bool(true)
        },
        LedgerCommand::Issue { sender, student, metadata } => {
            let id = ledger.issue_credential(&sender.into(), &student.into(), metadata)?;
            json!(id.get())
        },
        LedgerCommand::Revoke { sender, id } => {
            ledger.revoke_credential(&sender.into(), CredentialId::new(id))?;
            Value::Bool(true)
        },
        LedgerCommand::Get { id } => record_json(ledger.get_credential(CredentialId::new(id))?),
        LedgerCommand::Admin => json!(ledger.admin().as_str()),
    };
    Ok(value)
}

fn record_json(record: &CredentialRecord) -> Value {
    json!({
        "issuer": record.issuer().as_str(),
        "student": record.student().as_str(),
        "metadata": record.metadata(),
        "active": record.is_active(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use certchain::storage::MemoryStore;

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::open(MemoryStore::new(), Principal::from("A")).unwrap()
    }

    fn run(ledger: &mut Ledger<MemoryStore>, command: LedgerCommand) -> Value {
        serde_json::to_value(execute(ledger, command)).unwrap()
    }

    #[test]
    fn success_wraps_value() {
        let mut ledger = ledger();
        let add = LedgerCommand::AddInstitution { caller: "A".into(), institution: "I".into() };
        assert_eq!(run(&mut ledger, add), json!({ "value": true }));

        let issue = LedgerCommand::Issue {
            sender: "I".into(),
            student: "S".into(),
            metadata: "M".into(),
        };
        assert_eq!(run(&mut ledger, issue), json!({ "value": 1 }));

        assert_eq!(
            run(&mut ledger, LedgerCommand::Get { id: 1 }),
            json!({ "value": { "issuer": "I", "student": "S", "metadata": "M", "active": true } })
        );
    }

    #[test]
    fn state_changes_report_true() {
        let mut ledger = ledger();
        let commands = [
            LedgerCommand::AddInstitution { caller: "A".into(), institution: "I".into() },
            LedgerCommand::Issue { sender: "I".into(), student: "S".into(), metadata: "M".into() },
            LedgerCommand::Revoke { sender: "I".into(), id: 1 },
            LedgerCommand::RemoveInstitution { caller: "A".into(), institution: "I".into() },
            LedgerCommand::TransferAdmin { caller: "A".into(), new_admin: "B".into() },
        ];
        let outputs: Vec<Value> = commands.into_iter().map(|c| run(&mut ledger, c)).collect();

        assert_eq!(
            outputs,
            vec![
                json!({ "value": true }),
                json!({ "value": 1 }),
                json!({ "value": true }),
                json!({ "value": true }),
                json!({ "value": true }),
            ]
        );
    }

    #[test]
    fn failure_carries_code_and_message() {
        let mut ledger = ledger();
        let out = run(&mut ledger, LedgerCommand::Get { id: 4 });
        assert_eq!(out["error"], json!(102));
        assert!(out["message"].as_str().unwrap().contains('4'));

        let response = execute(
            &mut ledger,
            LedgerCommand::TransferAdmin { caller: "B".into(), new_admin: "B".into() },
        );
        assert!(!response.is_ok());
    }
}
