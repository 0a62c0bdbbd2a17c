use super::Fragment;
use crate::bufpool::SqlBuf;
use crate::error::BuildResult;
use crate::formatter::{Formatter, QueryAppender};

/// Ordered, append-only list of fragments.
///
/// Table lists and column lists are both `FragmentList`s and render through the
/// same joiner; only the statement skeleton around them differs. An empty list
/// renders nothing, which is how an absent clause is represented.
#[derive(Debug, Clone, Default)]
pub struct FragmentList {
    items: Vec<Fragment>,
}

impl FragmentList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.items.push(fragment);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Fragment> {
        self.items.first()
    }

    pub fn get(&self, index: usize) -> Option<&Fragment> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.items.iter()
    }

    /// Render every fragment, separated by `sep`.
    pub fn append_joined(&self, fmter: &Formatter, out: &mut SqlBuf, sep: &str) -> BuildResult<()> {
        let mark = out.mark();
        for (i, fragment) in self.items.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            if let Err(err) = fragment.append_query(fmter, out) {
                out.rollback(mark);
                return Err(err);
            }
        }
        Ok(())
    }
}

impl QueryAppender for FragmentList {
    /// Comma-separated rendering.
    fn append_query(&self, fmter: &Formatter, out: &mut SqlBuf) -> BuildResult<()> {
        self.append_joined(fmter, out, ", ")
    }
}

impl<'a> IntoIterator for &'a FragmentList {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Fragment> for FragmentList {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
