use super::*;
use blackjack::{Card, Outcome, Rank, RoundPhase, ScriptedDeck, Suit, TableRules};
use crate::msg::{InstantiateMsg, QueryMsg, QueryResponse};
use crate::state::{MemoryStorage, Storage, StoreError, BALANCE, DEBT};
use crate::TableError;
use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

fn c(rank: Rank) -> Card {
    Card::new(rank, Suit::Clubs)
}

fn open(balance: u64, ranks: &[Rank]) -> Session {
    let msg = InstantiateMsg {
        starting_balance: Some(balance),
        rules: None,
    };
    let deck = ScriptedDeck::new(ranks.iter().map(|r| c(*r)));
    instantiate(msg, Box::new(MemoryStorage::new()), Box::new(deck)).unwrap()
}

#[test]
fn test_instantiate_uses_starting_balance() {
    let session = open(1000, &[]);
    let table = session.table();
    assert_eq!(table.balance, 1000);
    assert_eq!(table.debt, 0);
    assert_eq!(table.phase, RoundPhase::Idle);
    assert_eq!(table.locked_bet, None);
}

#[test]
fn test_instantiate_restores_persisted_wallet() {
    let mut store = MemoryStorage::new();
    BALANCE.save(&mut store, 321).unwrap();
    DEBT.save(&mut store, 55).unwrap();

    let session = instantiate(
        InstantiateMsg::default(),
        Box::new(store),
        Box::new(ScriptedDeck::new(Vec::new())),
    )
    .unwrap();
    assert_eq!(session.wallet().balance, 321);
    assert_eq!(session.wallet().debt, 55);
}

#[test]
fn test_instantiate_defaults_to_rules_balance() {
    let session = instantiate(
        InstantiateMsg::default(),
        Box::new(MemoryStorage::new()),
        Box::new(ScriptedDeck::new(Vec::new())),
    )
    .unwrap();
    assert_eq!(session.wallet().balance, 1000);
}

#[test]
fn test_instantiate_msg_with_zero_denominator_rejected() {
    let mut msg = serde_json::to_value(InstantiateMsg {
        starting_balance: None,
        rules: Some(TableRules::default()),
    })
    .unwrap();
    msg["rules"]["blackjack_payout"]["denominator"] = 0.into();
    assert!(serde_json::from_value::<InstantiateMsg>(msg).is_err());

    let raw = r#"{"starting_balance":10,"rules":null}"#;
    let msg: InstantiateMsg = serde_json::from_str(raw).unwrap();
    let session = instantiate(
        msg,
        Box::new(MemoryStorage::new()),
        Box::new(ScriptedDeck::new(Vec::new())),
    )
    .unwrap();
    assert_eq!(session.round().rules(), &TableRules::default());
}

#[test]
fn test_settled_round_reports_idle_with_outcome() {
    let mut session = open(1000, &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Eight, Rank::King]);
    execute(&mut session, ExecuteMsg::StartRound { bet: 50 }).unwrap();
    let res = execute(&mut session, ExecuteMsg::Hit {}).unwrap();
    assert!(res.settlement.is_some());
    assert_eq!(res.table.phase, RoundPhase::Idle);
    assert_eq!(res.table.outcome, Outcome::DealerWin);

    let json = serde_json::to_value(&res.table).unwrap();
    assert_eq!(json["phase"], "Idle");
    assert_eq!(json["outcome"], "DealerWin");
}

#[test]
fn test_start_round_snapshot_hides_hole_card() {
    let mut session = open(1000, &[Rank::Ten, Rank::Seven, Rank::Nine, Rank::Eight]);
    let res = execute(&mut session, ExecuteMsg::StartRound { bet: 50 }).unwrap();

    assert_eq!(res.attribute("action"), Some("start_round"));
    assert_eq!(res.settlement, None);
    let table = res.table;
    assert_eq!(table.balance, 950);
    assert_eq!(table.locked_bet, Some(50));
    assert_eq!(table.phase, RoundPhase::InProgress);
    assert_eq!(table.message, "Your turn");
    assert_eq!(table.player_value, 17);
    assert_eq!(table.dealer_cards, vec![c(Rank::Nine)]);
    assert_eq!(table.dealer_value, 9);
    assert!(table.dealer_hidden_card);
    assert!(!table.dealer_cards.contains(&c(Rank::Eight)));
    // locking a bet is a wallet change and gets persisted
    assert_eq!(BALANCE.may_load(session.store()).unwrap(), Some(950));
}

#[test]
fn test_rejected_start_round_leaves_state_alone() {
    let mut session = open(30, &[]);
    let before = session.table();
    let err = execute(&mut session, ExecuteMsg::StartRound { bet: 50 }).unwrap_err();
    assert_eq!(err.to_string(), "Insufficient funds. Borrow or lower your bet.");
    assert!(err.is_rejection());
    assert_eq!(session.table(), before);
    assert_eq!(BALANCE.may_load(session.store()).unwrap(), None);
}

#[test]
fn test_handle_reports_reason() {
    let mut session = open(1000, &[]);
    let ack = session.handle(ExecuteMsg::StartRound { bet: 0 });
    assert!(!ack.accepted);
    assert_eq!(ack.reason.as_deref(), Some("Set a bet greater than 0"));
    assert_eq!(ack.table.balance, 1000);

    let ack = session.handle(ExecuteMsg::Hit {});
    assert!(!ack.accepted);
    assert_eq!(ack.reason.as_deref(), Some("No round in progress"));
}

#[test]
fn test_natural_settles_immediately() {
    let mut session = open(1000, &[Rank::Ace, Rank::King, Rank::Two, Rank::Three]);
    let res = execute(&mut session, ExecuteMsg::StartRound { bet: 50 }).unwrap();

    let settlement = res.settlement.expect("natural settles on the deal");
    assert_eq!(settlement.credited, 125);
    assert_eq!(res.table.balance, 1075);
    assert_eq!(res.table.message, "Blackjack! You win!");
    assert_eq!(res.table.outcome, Outcome::PlayerWin);
    assert_eq!(res.table.phase, RoundPhase::Idle);
    assert_eq!(res.table.locked_bet, None);
    assert_eq!(res.table.stats.player_wins, 1);
    assert_eq!(BALANCE.may_load(session.store()).unwrap(), Some(1075));
}

#[test]
fn test_hit_bust_then_stand_rejected() {
    let mut session = open(
        1000,
        &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Eight, Rank::Queen],
    );
    execute(&mut session, ExecuteMsg::StartRound { bet: 50 }).unwrap();
    let res = execute(&mut session, ExecuteMsg::Hit {}).unwrap();

    assert_eq!(res.table.message, "Bust! Dealer wins!");
    assert_eq!(res.table.outcome, Outcome::DealerWin);
    assert_eq!(res.table.balance, 950);
    assert_eq!(res.table.stats.dealer_wins, 1);

    let before = session.table();
    assert!(matches!(
        execute(&mut session, ExecuteMsg::Stand {}),
        Err(TableError::Round(_))
    ));
    assert_eq!(session.table(), before);
}

#[test]
fn test_stand_reveals_dealer_hand() {
    let mut session = open(
        1000,
        &[Rank::Ten, Rank::Nine, Rank::Six, Rank::Five, Rank::Seven],
    );
    execute(&mut session, ExecuteMsg::StartRound { bet: 100 }).unwrap();
    let res = execute(&mut session, ExecuteMsg::Stand {}).unwrap();

    // player 19, dealer 6 + 5 + 7 = 18
    assert_eq!(res.table.dealer_cards, vec![c(Rank::Six), c(Rank::Five), c(Rank::Seven)]);
    assert_eq!(res.table.dealer_value, 18);
    assert!(!res.table.dealer_hidden_card);
    assert_eq!(res.table.message, "You win!");
    assert_eq!(res.table.balance, 1100);
}

#[test]
fn test_borrow_and_repay_messages() {
    let mut session = open(0, &[]);
    let res = execute(&mut session, ExecuteMsg::Borrow { amount: 100 }).unwrap();
    assert_eq!(res.table.message, "Borrowed 100 chips (fee applied: 10).");
    assert_eq!(res.attribute("fee"), Some("10"));
    assert_eq!((res.table.balance, res.table.debt), (100, 110));
    assert_eq!(DEBT.may_load(session.store()).unwrap(), Some(110));

    let res = execute(&mut session, ExecuteMsg::Repay { amount: Some(40) }).unwrap();
    assert_eq!(res.table.message, "Repaid 40 chips of debt.");
    assert_eq!((res.table.balance, res.table.debt), (60, 70));
    assert_eq!(BALANCE.may_load(session.store()).unwrap(), Some(60));
}

#[test]
fn test_borrow_zero_rejected() {
    let mut session = open(10, &[]);
    let err = execute(&mut session, ExecuteMsg::Borrow { amount: 0 }).unwrap_err();
    assert!(matches!(err, TableError::Wallet(_)));
    assert_eq!(session.wallet().balance, 10);
}

#[test]
fn test_repay_without_debt_rejected() {
    let mut session = open(10, &[]);
    let ack = session.handle(ExecuteMsg::Repay { amount: None });
    assert_eq!(ack.reason.as_deref(), Some("No outstanding debt to repay."));
}

#[test]
fn test_queries() {
    let mut session = open(1000, &[Rank::Ten, Rank::Seven, Rank::Nine, Rank::Eight]);
    execute(&mut session, ExecuteMsg::StartRound { bet: 50 }).unwrap();

    match query(&session, QueryMsg::Wallet {}) {
        QueryResponse::Wallet(wallet) => {
            assert_eq!(wallet.balance, 950);
            assert_eq!(wallet.locked_bet, Some(50));
        }
        other => panic!("unexpected response {other:?}"),
    }
    match query(&session, QueryMsg::Stats {}) {
        QueryResponse::Stats(stats) => {
            assert_eq!(stats.player_wins + stats.dealer_wins + stats.ties, 0)
        }
        other => panic!("unexpected response {other:?}"),
    }
    match query(&session, QueryMsg::Table {}) {
        QueryResponse::Table(table) => assert!(table.dealer_hidden_card),
        other => panic!("unexpected response {other:?}"),
    }
}

/// Store shared with the test, with a switch that makes every write fail.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: Rc<RefCell<MemoryStorage>>,
    failing: Rc<Cell<bool>>,
}

impl Storage for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        self.inner.borrow().get(key)
    }

    fn set_many(&mut self, entries: &[(&str, u64)]) -> Result<(), StoreError> {
        if self.failing.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full").into());
        }
        self.inner.borrow_mut().set_many(entries)
    }
}

fn open_flaky(balance: u64, ranks: &[Rank]) -> (Session, FlakyStore) {
    let store = FlakyStore::default();
    let msg = InstantiateMsg {
        starting_balance: Some(balance),
        rules: None,
    };
    let deck = ScriptedDeck::new(ranks.iter().map(|r| c(*r)));
    let session = instantiate(msg, Box::new(store.clone()), Box::new(deck)).unwrap();
    (session, store)
}

fn saved(store: &FlakyStore) -> (Option<u64>, Option<u64>) {
    (BALANCE.may_load(store).unwrap(), DEBT.may_load(store).unwrap())
}

#[test]
fn test_unsaved_start_round_is_not_applied() {
    let hand = [Rank::Ten, Rank::Seven, Rank::Nine, Rank::Eight];
    let (mut session, store) = open_flaky(1000, &hand.repeat(3));
    store.failing.set(true);
    let before = session.table();

    let err = execute(&mut session, ExecuteMsg::StartRound { bet: 50 }).unwrap_err();
    assert!(matches!(err, TableError::Store(_)));
    assert!(!err.is_rejection());
    assert_eq!(session.table(), before);
    assert_eq!(session.round().phase(), RoundPhase::Idle);
    assert_eq!(saved(&store), (None, None));

    let ack = session.handle(ExecuteMsg::StartRound { bet: 50 });
    assert!(!ack.accepted);
    assert_eq!(ack.reason.as_deref(), Some("Storage error: I/O error: disk full"));
    assert_eq!(ack.table, before);

    // nothing is stuck: once the store recovers the same bet goes through
    store.failing.set(false);
    let ack = session.handle(ExecuteMsg::StartRound { bet: 50 });
    assert!(ack.accepted);
    assert_eq!(ack.table.phase, RoundPhase::InProgress);
    assert_eq!(ack.table.balance, 950);
    assert_eq!(saved(&store), (Some(950), Some(0)));
}

#[test]
fn test_unsaved_stand_keeps_round_open() {
    let (mut session, store) = open_flaky(
        1000,
        &[Rank::Ten, Rank::Nine, Rank::Six, Rank::Five, Rank::Seven, Rank::Seven],
    );
    execute(&mut session, ExecuteMsg::StartRound { bet: 100 }).unwrap();
    store.failing.set(true);
    let before = session.table();

    let err = execute(&mut session, ExecuteMsg::Stand {}).unwrap_err();
    assert!(matches!(err, TableError::Store(_)));
    assert_eq!(session.table(), before);
    assert!(session.round().has_hidden_card());
    assert_eq!(session.stats().rounds(), 0);
    assert_eq!(saved(&store), (Some(900), Some(0)));

    store.failing.set(false);
    let res = execute(&mut session, ExecuteMsg::Stand {}).unwrap();
    assert_eq!(res.table.message, "You win!");
    assert_eq!(saved(&store), (Some(1100), Some(0)));
}

#[test]
fn test_hit_without_wallet_change_needs_no_save() {
    let (mut session, store) = open_flaky(
        1000,
        &[Rank::Two, Rank::Three, Rank::Nine, Rank::Eight, Rank::Four],
    );
    execute(&mut session, ExecuteMsg::StartRound { bet: 10 }).unwrap();
    store.failing.set(true);

    let res = execute(&mut session, ExecuteMsg::Hit {}).unwrap();
    assert_eq!(res.table.player_value, 9);
    assert_eq!(res.table.phase, RoundPhase::InProgress);
}

#[test]
fn test_unsaved_borrow_is_not_applied() {
    let (mut session, store) = open_flaky(1000, &[]);
    store.failing.set(true);

    let err = execute(&mut session, ExecuteMsg::Borrow { amount: 100 }).unwrap_err();
    assert!(matches!(err, TableError::Store(_)));
    assert_eq!((session.wallet().balance, session.wallet().debt), (1000, 0));
    assert_eq!(session.message(), "");
    assert_eq!(saved(&store), (None, None));

    store.failing.set(false);
    execute(&mut session, ExecuteMsg::Borrow { amount: 100 }).unwrap();
    assert_eq!(saved(&store), (Some(1100), Some(110)));
}

#[test]
fn test_unsaved_repay_is_not_applied() {
    let (mut session, store) = open_flaky(0, &[]);
    execute(&mut session, ExecuteMsg::Borrow { amount: 100 }).unwrap();
    store.failing.set(true);

    let ack = session.handle(ExecuteMsg::Repay { amount: Some(40) });
    assert!(!ack.accepted);
    assert_eq!(ack.reason.as_deref(), Some("Storage error: I/O error: disk full"));
    assert_eq!((ack.table.balance, ack.table.debt), (100, 110));
    assert_eq!(ack.table.message, "Borrowed 100 chips (fee applied: 10).");
    assert_eq!(saved(&store), (Some(100), Some(110)));
}
