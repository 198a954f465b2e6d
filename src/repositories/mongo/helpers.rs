use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::Result as MongoResult;
use mongodb::options::{Acknowledgment, ReadConcern, TransactionOptions, WriteConcern};
use mongodb::{Client, ClientSession, Collection, Database};
use tracing::Instrument;

use super::converters::{convert_404_or, convert_repo_err, to_bool};
use super::Result as RepoResult;
use crate::utils::LetChain;

/// Reruns a transaction body while the server labels the failure transient.
macro_rules! retry_transient {
    ($body:expr) => {
        loop {
            let r = $body;
            if let Err(ref e) = r {
                if e.contains_label(::mongodb::error::TRANSIENT_TRANSACTION_ERROR) {
                    ::tracing::debug!("transient transaction error, retrying: {}", e);
                    continue;
                }
            }

            break r;
        }
    };
}
pub(crate) use retry_transient;

/// Creates one unique index per entry of `uniques`.
pub async fn initialize_coll(
    coll_name: &str,
    uniques: &[&[&str]],
    db: &Database,
) -> MongoResult<()> {
    let indexes = uniques
        .iter()
        .map(|fields| {
            let mut key = Document::new();
            for f in fields.iter() {
                key.insert(*f, 1);
            }

            doc! {
                "name": format!("unique_{}", fields.join("_").replace('.', "_")),
                "key": key,
                "unique": true,
            }
        })
        .collect::<Vec<_>>();

    db.run_command(
        doc! {
            "createIndexes": coll_name,
            "indexes": indexes,
        },
        None,
    )
    .instrument(tracing::trace_span!("run_command", coll = coll_name))
    .await?;

    Ok(())
}

pub async fn make_session(c: &Client) -> MongoResult<ClientSession> {
    let mut s = c
        .start_session(None)
        .instrument(tracing::trace_span!("start_session"))
        .await?;

    let ta_opt = TransactionOptions::builder()
        .read_concern(ReadConcern::snapshot())
        .write_concern(WriteConcern::builder().w(Acknowledgment::Majority).build())
        .build();
    s.start_transaction(ta_opt)
        .instrument(tracing::trace_span!("start_transaction"))
        .await?;

    Ok(s)
}

pub async fn process_transaction(s: &mut ClientSession) -> MongoResult<()> {
    loop {
        let r = s
            .commit_transaction()
            .instrument(tracing::trace_span!("commit_transaction"))
            .await;
        if let Err(ref e) = r {
            if e.contains_label(::mongodb::error::UNKNOWN_TRANSACTION_COMMIT_RESULT) {
                continue;
            }
        }

        break r;
    }
}

pub async fn get_set<T>(coll: &Collection<T>, id: impl Into<Bson>) -> RepoResult<T>
where T: Sync + Send + Unpin + ::serde::de::DeserializeOwned {
    let res = coll
        .find_one(doc! { "id": id.into() }, None)
        .instrument(tracing::trace_span!("find_one"))
        .await
        .let_(convert_repo_err)?
        .let_(convert_404_or)?;

    Ok(res)
}

pub async fn get_all<T>(coll: &Collection<T>, filter: Document) -> RepoResult<Vec<T>>
where T: Sync + Send + Unpin + ::serde::de::DeserializeOwned {
    coll.find(filter, None)
        .instrument(tracing::trace_span!("find"))
        .await
        .let_(convert_repo_err)?
        .try_collect::<Vec<_>>()
        .await
        .let_(convert_repo_err)
}

pub async fn get_all_with_session<T>(
    coll: &Collection<T>,
    filter: Document,
    session: &mut ClientSession,
) -> MongoResult<Vec<T>>
where
    T: Sync + Send + Unpin + ::serde::de::DeserializeOwned,
{
    let mut cursor = coll
        .find_with_session(filter, None, session)
        .instrument(tracing::trace_span!("find_with_session"))
        .await?;

    cursor.stream(session).try_collect().await
}

#[derive(Clone, Copy)]
pub enum ModifyOpTy {
    Push,
    Pull,
}

/// `$addToSet` / `$pull` on an array field. `Ok(false)` when nothing changed.
pub async fn modify_set<T>(
    name: impl AsRef<str>,
    coll: &Collection<T>,
    id: impl Into<Bson>,
    target: impl Into<Bson>,
    ty: ModifyOpTy,
) -> RepoResult<bool> {
    let operation = match ty {
        ModifyOpTy::Push => "$addToSet",
        ModifyOpTy::Pull => "$pull",
    };

    let res = coll
        .update_one(
            doc! { "id": id.into() },
            doc! { operation: { name.as_ref(): target.into() } },
            None,
        )
        .instrument(tracing::trace_span!("update_one"))
        .await
        .let_(convert_repo_err)?;

    if !res.matched_count.let_(to_bool) {
        return Err(super::RepositoryError::NotFound);
    }

    Ok(res.modified_count.let_(to_bool))
}
