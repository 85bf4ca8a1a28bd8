use blackjack::{CardSource, Round, RoundError, RoundStatus, SessionStats, Settlement, Wallet};
use log::{debug, error, info, warn};

use crate::error::TableError;
use crate::msg::{ExecuteMsg, Response};
use crate::session::Session;
use crate::state::{save_wallet, StoreError};

const YOUR_TURN: &str = "Your turn";

/// Every operation works on a copy of the session state and only commits it
/// once the wallet has been saved: a rejection or a failed write leaves the
/// session exactly as it was.
pub fn execute(session: &mut Session, msg: ExecuteMsg) -> Result<Response, TableError> {
    match msg {
        ExecuteMsg::StartRound { bet } => execute_start_round(session, bet),
        ExecuteMsg::Hit {} => execute_hit(session),
        ExecuteMsg::Stand {} => execute_stand(session),
        ExecuteMsg::Borrow { amount } => execute_borrow(session, amount),
        ExecuteMsg::Repay { amount } => execute_repay(session, amount),
    }
}

/// Round, wallet and counters as they will be once an operation commits.
struct Pending {
    round: Round,
    wallet: Wallet,
    stats: SessionStats,
}

impl Pending {
    fn from_session(session: &Session) -> Self {
        Self {
            round: session.round.clone(),
            wallet: session.wallet,
            stats: session.stats,
        }
    }
}

pub fn execute_start_round(session: &mut Session, bet: u64) -> Result<Response, TableError> {
    let status = play(session, "start_round", |pending, deck| {
        pending.round.start(bet, &mut pending.wallet, &mut pending.stats, deck)
    })?;

    info!(
        "dealt round: bet={} player={} up_card={}",
        bet,
        session.round.player_hand().value(),
        session
            .round
            .dealer_up_card()
            .map(|c| c.to_display())
            .unwrap_or_default()
    );
    let settlement = apply_status(session, status);

    Ok(Response::new(session.table())
        .add_attribute("action", "start_round")
        .add_attribute("bet", bet)
        .add_attribute("player_value", session.round.player_hand().value())
        .with_settlement(settlement))
}

pub fn execute_hit(session: &mut Session) -> Result<Response, TableError> {
    let status = play(session, "hit", |pending, deck| {
        pending.round.hit(&mut pending.wallet, &mut pending.stats, deck)
    })?;

    if let Some(card) = session.round.player_hand().cards.last() {
        debug!("player drew {}", card.to_display());
    }
    let settlement = apply_status(session, status);

    Ok(Response::new(session.table())
        .add_attribute("action", "hit")
        .add_attribute("player_value", session.round.player_hand().value())
        .with_settlement(settlement))
}

pub fn execute_stand(session: &mut Session) -> Result<Response, TableError> {
    let status = play(session, "stand", |pending, deck| {
        pending.round.stand(&mut pending.wallet, &mut pending.stats, deck)
    })?;

    let settlement = apply_status(session, status);

    Ok(Response::new(session.table())
        .add_attribute("action", "stand")
        .add_attribute("player_value", session.round.player_hand().value())
        .with_settlement(settlement))
}

pub fn execute_borrow(session: &mut Session, amount: u64) -> Result<Response, TableError> {
    let rules = *session.round.rules();
    let mut wallet = session.wallet;
    let loan = wallet.borrow(amount, &rules).map_err(|e| rejected("borrow", e))?;

    save_wallet(session.store.as_mut(), &wallet).map_err(|e| store_failed("borrow", e))?;
    session.wallet = wallet;
    session.message = format!("Borrowed {} chips (fee applied: {}).", loan.principal, loan.fee);
    info!(
        "borrowed {} fee={} balance={} debt={}",
        loan.principal, loan.fee, wallet.balance, wallet.debt
    );

    Ok(Response::new(session.table())
        .add_attribute("action", "borrow")
        .add_attribute("amount", loan.principal)
        .add_attribute("fee", loan.fee))
}

pub fn execute_repay(session: &mut Session, amount: Option<u64>) -> Result<Response, TableError> {
    let mut wallet = session.wallet;
    let repaid = wallet.repay(amount).map_err(|e| rejected("repay", e))?;

    save_wallet(session.store.as_mut(), &wallet).map_err(|e| store_failed("repay", e))?;
    session.wallet = wallet;
    session.message = format!("Repaid {repaid} chips of debt.");
    info!("repaid {} balance={} debt={}", repaid, wallet.balance, wallet.debt);

    Ok(Response::new(session.table())
        .add_attribute("action", "repay")
        .add_attribute("amount", repaid))
}

/// Run a round operation against a copy of the session, save the wallet if it
/// moved, then commit.
fn play<F>(session: &mut Session, action: &str, op: F) -> Result<RoundStatus, TableError>
where
    F: FnOnce(&mut Pending, &mut dyn CardSource) -> Result<RoundStatus, RoundError>,
{
    let mut pending = Pending::from_session(session);
    let status = op(&mut pending, session.deck.as_mut()).map_err(|e| rejected(action, e))?;

    if pending.wallet != session.wallet {
        save_wallet(session.store.as_mut(), &pending.wallet).map_err(|e| store_failed(action, e))?;
    }

    session.round = pending.round;
    session.wallet = pending.wallet;
    session.stats = pending.stats;
    Ok(status)
}

/// Update the user-facing message for a committed round operation.
fn apply_status(session: &mut Session, status: RoundStatus) -> Option<Settlement> {
    match status {
        RoundStatus::InProgress => {
            session.message = YOUR_TURN.to_string();
            None
        }
        RoundStatus::Settled(settlement) => {
            session.message = settlement.reason.message().to_string();
            info!(
                "round settled: {:?} bet={} credited={} player={} dealer={:?}",
                settlement.reason,
                settlement.bet,
                settlement.credited,
                settlement.player_value,
                settlement.dealer_value
            );
            Some(settlement)
        }
    }
}

fn rejected(action: &str, err: impl Into<TableError>) -> TableError {
    let err = err.into();
    warn!("{action} rejected: {err}");
    err
}

fn store_failed(action: &str, err: StoreError) -> TableError {
    error!("{action} not applied, wallet could not be saved: {err}");
    TableError::Store(err)
}
