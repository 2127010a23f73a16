//! Stream helpers shared by the adapters.

use futures::stream::{self, StreamExt};

pub type BoxStream<T> = futures::stream::BoxStream<'static, T>;

enum Side<A, B> {
    Left(A),
    Right(B),
}

/// Joins two streams, emitting the latest pair whenever either side yields.
///
/// Nothing is emitted until both sides have produced at least once. The joined stream ends
/// when both inputs have ended.
pub fn combine_latest<A, B>(left: BoxStream<A>, right: BoxStream<B>) -> BoxStream<(A, B)>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
{
    let tagged = stream::select(left.map(Side::Left), right.map(Side::Right));
    tagged
        .scan((None, None), |latest: &mut (Option<A>, Option<B>), item| {
            match item {
                Side::Left(a) => latest.0 = Some(a),
                Side::Right(b) => latest.1 = Some(b),
            }
            let pair = match latest {
                (Some(a), Some(b)) => Some((a.clone(), b.clone())),
                _ => None,
            };
            futures::future::ready(Some(pair))
        })
        .filter_map(futures::future::ready)
        .boxed()
}

/// A stream that yields `value` once and ends.
pub fn once<T: Send + 'static>(value: T) -> BoxStream<T> {
    stream::once(futures::future::ready(value)).boxed()
}
