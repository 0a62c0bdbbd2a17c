//! Table models.
//!
//! A model only tells a statement which table it targets; mapping struct
//! fields to columns is left to the caller.

use crate::error::BuildResult;
use crate::ident::Ident;

/// A type that knows its table.
///
/// # Example
/// ```ignore
/// struct User;
///
/// impl TableModel for User {
///     fn table_name(&self) -> &str {
///         "users"
///     }
/// }
/// ```
pub trait TableModel {
    /// Possibly qualified table name (`schema.table`).
    fn table_name(&self) -> &str;

    /// Alias used by `?TableAlias`; defaults to the table name.
    fn table_alias(&self) -> Option<&str> {
        None
    }
}

impl<T: TableModel + ?Sized> TableModel for &T {
    fn table_name(&self) -> &str {
        (**self).table_name()
    }

    fn table_alias(&self) -> Option<&str> {
        (**self).table_alias()
    }
}

/// Validated table identifiers captured from a [`TableModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelTable {
    pub(crate) table: Ident,
    pub(crate) alias: Option<Ident>,
}

impl ModelTable {
    pub(crate) fn from_model<M: TableModel + ?Sized>(model: &M) -> BuildResult<Self> {
        let table = Ident::new(model.table_name());
        table.validate()?;
        let alias = match model.table_alias() {
            Some(alias) => {
                let alias = Ident::quoted(alias);
                alias.validate()?;
                Some(alias)
            }
            None => None,
        };
        Ok(Self { table, alias })
    }
}
