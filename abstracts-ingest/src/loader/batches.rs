//! Fixed-size batching over a fallible record stream.

use abstracts_shared::Article;

/// Groups a record stream into consecutive batches of at most `batch_size`.
///
/// Records keep their arrival order and each appears in exactly one batch;
/// only the last batch may be short. An error from the underlying stream is
/// passed through (the partially filled batch is discarded) and ends the
/// iteration.
pub struct Batches<I> {
    records: I,
    batch_size: usize,
    done: bool,
}

impl<I> Batches<I> {
    /// Wrap a record stream. A `batch_size` of zero is treated as one.
    pub fn new(records: I, batch_size: usize) -> Self {
        Self {
            records,
            batch_size: batch_size.max(1),
            done: false,
        }
    }
}

impl<I, E> Iterator for Batches<I>
where
    I: Iterator<Item = Result<Article, E>>,
{
    type Item = Result<Vec<Article>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.records.next() {
                Some(Ok(article)) => batch.push(article),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}
