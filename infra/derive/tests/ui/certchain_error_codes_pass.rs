use certchain_derive::certchain_error;
use std::borrow::Cow;

#[certchain_error]
pub enum LedgerError {
    #[code(100)]
    #[error("Not authorized{}: {caller}", format_context(.context))]
    NotAuthorized { caller: String, context: Option<Cow<'static, str>> },

    #[code(102)]
    #[error("Not found{}: {id}", format_context(.context))]
    NotFound { id: u64, context: Option<Cow<'static, str>> },
}

fn main() {
    let err = LedgerError::NotFound { id: 7, context: None };
    let _: u16 = err.code();
}
