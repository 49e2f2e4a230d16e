use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use crate::errors::Result;
use crate::rarity::RarityService;
use crate::scores::{ScoresService, SyncOutcome, TotalsService};
use crate::stats::StatsService;
use crate::steam::{FetchOutcome, SteamApi};
use crate::users::{User, UsersRepository};

use super::jobs_model::Job;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Everything a job handler may touch, shared across workers.
pub struct JobContext {
    pub users_repository: Arc<UsersRepository>,
    pub scores_service: Arc<ScoresService>,
    pub totals_service: Arc<TotalsService>,
    pub rarity_service: Arc<RarityService>,
    pub stats_service: Arc<StatsService>,
    pub steam_api: Arc<dyn SteamApi>,
}

/// Fire-and-forget handle to the background queue. Enqueueing never
/// blocks the caller; when the queue is full the job is dropped and the
/// caller observes nothing worse than a stale view until the next
/// trigger.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<Job>,
}

impl JobQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Job>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, job: Job) {
        let kind = job.kind();
        match self.tx.try_send(job) {
            Ok(()) => debug!("[Jobs] Enqueued {}", kind),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("[Jobs] Queue full, dropping {}", kind);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("[Jobs] Queue closed, dropping {}", kind);
            }
        }
    }
}

/// Single receiver loop; each job runs on its own task, bounded by a
/// semaphore so a burst of syncs cannot starve the runtime. Handler
/// failures are logged and dropped, the next scheduled trigger re-runs
/// the same recompute.
pub fn spawn_runner(
    ctx: Arc<JobContext>,
    queue: JobQueue,
    mut rx: mpsc::Receiver<Job>,
    concurrency: usize,
) -> JoinHandle<()> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let ctx = ctx.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                let kind = job.kind();
                if let Err(e) = run_job(&ctx, &queue, job).await {
                    error!("[Jobs] {} failed: {}", kind, e);
                }
                drop(permit);
            });
        }
        info!("[Jobs] Runner stopped, queue closed");
    })
}

pub async fn run_job(ctx: &JobContext, queue: &JobQueue, job: Job) -> Result<()> {
    match job {
        Job::UpdateRarityForGame { app_id } => {
            ctx.rarity_service.update_rarity_for_game(app_id).await
        }
        Job::SyncGameAchievements { user_id, app_id } => {
            let Some(user) = load_user(ctx, &user_id)? else {
                return Ok(());
            };
            sync_game(ctx, queue, &user, app_id).await
        }
        Job::RecalculateUserXp { user_id } => {
            let Some(user) = load_user(ctx, &user_id)? else {
                return Ok(());
            };
            dispatch_user_sync(ctx, queue, &user).await
        }
        Job::CalculateLatestAchievements { user_id } => {
            let Some(user) = load_user(ctx, &user_id)? else {
                return Ok(());
            };
            ctx.stats_service
                .refresh_latest_achievements(&user)
                .await
                .map(|_| ())
        }
        Job::CalculateNearlyCompletedGames { user_id } => {
            let Some(user) = load_user(ctx, &user_id)? else {
                return Ok(());
            };
            ctx.stats_service
                .refresh_nearly_completed_games(&user)
                .await
                .map(|_| ())
        }
        Job::CalculateUserGlobalStats { user_id } => {
            let Some(user) = load_user(ctx, &user_id)? else {
                return Ok(());
            };
            ctx.stats_service
                .refresh_global_completion(&user)
                .await
                .map(|_| ())
        }
    }
}

fn load_user(ctx: &JobContext, user_id: &str) -> Result<Option<User>> {
    let user = ctx.users_repository.get_by_id(user_id)?;
    if user.is_none() {
        warn!("[Jobs] Unknown user {}, dropping job", user_id);
    }
    Ok(user)
}

/// Per-game unit of the aggregation pipeline: make sure the rarity
/// table is being refreshed, sync the score snapshot, then re-project
/// the user's totals when the snapshot actually moved.
async fn sync_game(ctx: &JobContext, queue: &JobQueue, user: &User, app_id: i64) -> Result<()> {
    if ctx.rarity_service.mark_refresh_due(app_id).await {
        queue.enqueue(Job::UpdateRarityForGame { app_id });
    }

    let outcome = ctx.scores_service.sync_game_achievements(user, app_id).await?;
    if let SyncOutcome::Updated(_) = outcome {
        ctx.totals_service.project_user_totals(user).await?;
    }
    Ok(())
}

/// The dispatcher fans a whole library out into per-game sync jobs and
/// returns without waiting on any of them. An unavailable or empty
/// library aborts the run before anything is enqueued; existing
/// snapshots stay as they are.
async fn dispatch_user_sync(ctx: &JobContext, queue: &JobQueue, user: &User) -> Result<()> {
    let games = match ctx.steam_api.get_owned_games(&user.steam_id_64).await {
        FetchOutcome::Success(games) if !games.is_empty() => games,
        FetchOutcome::Success(_) | FetchOutcome::EmptyOrUnsupported => {
            warn!(
                "[Dispatch] No owned games for steam_id {}, nothing to sync",
                user.steam_id_64
            );
            return Ok(());
        }
        FetchOutcome::TransientFailure => {
            warn!(
                "[Dispatch] Owned games fetch failed for steam_id {}, aborting",
                user.steam_id_64
            );
            return Ok(());
        }
    };

    let count = games.len();
    for game in games {
        queue.enqueue(Job::SyncGameAchievements {
            user_id: user.id.clone(),
            app_id: game.app_id,
        });
    }

    info!(
        "[Dispatch] Enqueued {} game syncs for steam_id {}",
        count, user.steam_id_64
    );
    Ok(())
}
