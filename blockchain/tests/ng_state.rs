use std::sync::Arc;

use lagoon_blockchain::NgState;
use lagoon_primitives::Scheme;
use lagoon_test_utils::{
    block_id, key_block, micro_block, transfer, MemoryApplier, MemoryLedger,
};

fn machine(
    ledger: &Arc<MemoryLedger>,
) -> Arc<NgState<MemoryLedger, Arc<MemoryApplier>>> {
    let applier = Arc::new(MemoryApplier::new(Arc::clone(ledger)));
    Arc::new(NgState::new(Scheme::Testnet, Arc::clone(ledger), applier))
}

fn machine_with_applier(
    ledger: &Arc<MemoryLedger>,
    applier: Arc<MemoryApplier>,
) -> NgState<MemoryLedger, Arc<MemoryApplier>> {
    NgState::new(Scheme::Testnet, Arc::clone(ledger), applier)
}

#[test]
fn cold_start_then_key_block() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);

    assert_eq!(state.last_block_id(), None);
    state.block_applied();
    assert_eq!(state.last_block_id(), Some(b0.id().clone()));
    assert_eq!(state.liquid_block().unwrap(), b0);

    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());

    assert_eq!(state.last_block_id(), Some(b1.id().clone()));
    assert_eq!(ledger.head(), b1);
    assert_eq!(ledger.ids(), vec![b0.id().clone(), b1.id().clone()]);
}

#[test]
fn micro_block_rewrites_the_tip() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());

    let extra = transfer(30);
    state.add_micro_block(micro_block(3, b1.id(), vec![extra.clone()]));

    // The tip was rewritten in place: same height, same parent, the
    // announced signature, and the accumulated transactions.
    assert_eq!(state.last_block_id(), Some(block_id(3)));
    let head = ledger.head();
    assert_eq!(head.id(), &block_id(3));
    assert_eq!(head.parent(), b0.id());
    let mut expected = b1.transactions.clone();
    expected.push(extra);
    assert_eq!(head.transactions, expected);
    assert_eq!(ledger.ids().len(), 2);
}

#[test]
fn chained_micro_blocks_accumulate() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());

    state.add_micro_block(micro_block(3, b1.id(), vec![transfer(30)]));
    state.add_micro_block(micro_block(4, &block_id(3), vec![transfer(40)]));

    assert_eq!(state.last_block_id(), Some(block_id(4)));
    let head = ledger.head();
    assert_eq!(head.transaction_count(), b1.transaction_count() + 2);
    assert_eq!(head.parent(), b0.id());
}

#[test]
fn duplicate_key_block_is_ignored() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());
    let ids = ledger.ids();

    state.add_block(b1.clone());

    assert_eq!(ledger.ids(), ids);
    assert_eq!(state.last_block_id(), Some(b1.id().clone()));
}

#[test]
fn micro_block_before_any_block_is_ignored() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);

    state.add_micro_block(micro_block(3, b0.id(), vec![transfer(30)]));

    assert_eq!(state.last_block_id(), None);
    assert_eq!(ledger.ids().len(), 1);
}

#[test]
fn micro_block_with_stale_reference_is_dropped() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());
    state.add_micro_block(micro_block(3, b1.id(), vec![transfer(30)]));

    // References the key block although the tip has moved on.
    state.add_micro_block(micro_block(5, b1.id(), vec![transfer(50)]));

    assert_eq!(state.last_block_id(), Some(block_id(3)));
    assert_eq!(ledger.head().id(), &block_id(3));
}

#[test]
fn key_block_extending_the_liquid_tip_rebases_the_ledger() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());
    state.add_micro_block(micro_block(3, b1.id(), vec![transfer(30)]));

    // The next generator built on the liquid tip, whose id is not a
    // rollback target in the ledger. The machine rolls back one applied
    // block, restores the view one announcement back and applies on top.
    let b2 = key_block(4, &block_id(3));
    state.add_block(b2.clone());

    assert_eq!(state.last_block_id(), Some(b2.id().clone()));
    assert_eq!(
        ledger.ids(),
        vec![b0.id().clone(), b1.id().clone(), b2.id().clone()]
    );
}

#[test]
fn key_block_on_a_flushed_tip_rolls_back_directly() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());

    // Once the ledger flushed, the tip is a regular rollback target and no
    // rebase is needed.
    ledger.flush();
    let b2 = key_block(4, b1.id());
    state.add_block(b2.clone());

    assert_eq!(state.last_block_id(), Some(b2.id().clone()));
    assert_eq!(
        ledger.ids(),
        vec![b0.id().clone(), b1.id().clone(), b2.id().clone()]
    );
}

#[test]
fn rejected_key_block_restores_the_previous_tip() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let applier = Arc::new(MemoryApplier::new(Arc::clone(&ledger)));
    let state = machine_with_applier(&ledger, Arc::clone(&applier));
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());

    let b2 = key_block(4, b1.id());
    applier.reject(block_id(4));
    state.add_block(b2);

    assert_eq!(state.last_block_id(), Some(b1.id().clone()));
    assert_eq!(ledger.head(), b1);
    // The liquid view still ends at the restored tip.
    assert_eq!(state.liquid_block().unwrap().id(), b1.id());
}

#[test]
fn corrupted_ledger_head_stops_the_micro_block() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());

    // Something else replaced the head: its parent no longer matches the
    // liquid view.
    ledger.bootstrap(key_block(9, &block_id(8)));
    let ids = ledger.ids();

    state.add_micro_block(micro_block(3, b1.id(), vec![transfer(30)]));

    // No rollback or apply happened, but the micro block stays in the
    // liquid view awaiting the next fix-up.
    assert_eq!(ledger.ids(), ids);
    assert_eq!(state.last_block_id(), Some(b1.id().clone()));
    assert_eq!(state.liquid_block().unwrap().id(), &block_id(3));
}

#[test]
fn orphan_key_block_is_still_handed_to_the_applier() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();

    // Parent known neither to the ledger nor to the liquid view.
    let stray = key_block(7, &block_id(6));
    state.add_block(stray.clone());

    assert_eq!(state.last_block_id(), Some(stray.id().clone()));
    assert_eq!(ledger.head(), stray);
}

#[test]
fn external_apply_resets_the_liquid_view() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());
    state.add_micro_block(micro_block(3, b1.id(), vec![transfer(30)]));

    // Initial sync applied a block behind our back; the liquid chain is
    // superseded.
    let external = key_block(9, &block_id(3));
    ledger.bootstrap(external.clone());
    state.block_applied();

    assert_eq!(state.last_block_id(), Some(external.id().clone()));
    assert_eq!(state.liquid_block().unwrap(), external);
}

#[test]
fn repeated_notification_for_the_same_tip_is_a_no_op() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();
    let b1 = key_block(2, b0.id());
    state.add_block(b1.clone());
    state.add_micro_block(micro_block(3, b1.id(), vec![transfer(30)]));
    let liquid = state.liquid_block().unwrap();

    // The tip the ledger reports is the one this machine applied itself;
    // the liquid view must survive.
    state.block_applied();

    assert_eq!(state.last_block_id(), Some(block_id(3)));
    assert_eq!(state.liquid_block().unwrap(), liquid);
}

#[test]
fn concurrent_calls_do_not_interleave() {
    let b0 = key_block(1, &block_id(0));
    let ledger = MemoryLedger::new(b0.clone());
    let state = machine(&ledger);
    state.block_applied();

    let b1 = key_block(2, b0.id());
    let m1 = micro_block(3, b1.id(), vec![transfer(30)]);

    std::thread::scope(|scope| {
        let feeder = &state;
        let block = &b1;
        let micro = &m1;
        scope.spawn(move || {
            for _ in 0..100 {
                feeder.add_block(block.clone());
            }
        });
        scope.spawn(move || {
            for _ in 0..100 {
                feeder.add_micro_block(micro.clone());
            }
        });
        scope.spawn(move || {
            for _ in 0..100 {
                feeder.block_applied();
            }
        });
    });

    // Whatever the interleaving, the machine settled on one of the states
    // the event set can produce.
    let last = state.last_block_id().unwrap();
    assert!([b0.id().clone(), b1.id().clone(), block_id(3)].contains(&last));
    assert!([b0.id().clone(), b1.id().clone(), block_id(3)].contains(ledger.head().id()));
}
