use crate::auction::*;

fn next_down(amount: Amount) -> Amount {
    assert!(amount > 0.0);
    Amount::from_bits(amount.to_bits() - 1)
}

#[test]
fn minimum_is_twenty_percent_above_current() {
    assert_eq!(format!("{:.2}", minimum_next_bid(50.0)), "60.00");
    assert_eq!(format!("{:.2}", minimum_next_bid(500.0)), "600.00");
    assert_eq!(format!("{:.2}", minimum_next_bid(60.01)), "72.01");
}

#[test]
fn single_precision_minimum_is_slightly_above_display() {
    // 50 * 1.2 in f32 lands just above 60
    assert!(minimum_next_bid(50.0) > 60.0);
    assert!(!is_acceptable(60.0, 50.0));
    assert!(is_acceptable(60.01, 50.0));
}

#[test]
fn bid_equal_to_minimum_is_accepted_one_step_below_is_not() {
    for current in [0.01, 1.0, 50.0, 60.01, 500.0, 123_456.78] {
        let minimum = minimum_next_bid(current);
        assert!(is_acceptable(minimum, current), "{current}");
        assert!(!is_acceptable(next_down(minimum), current), "{current}");
    }
}

#[test]
fn place_bid_only_moves_up() {
    let mut auction = Auction::new(7, "Lamp", 10.0);

    assert_eq!(
        auction.place_bid(11.0, 1),
        BidOutcome::Rejected {
            auction_id: 7,
            minimum: minimum_next_bid(10.0),
            current_bid: 10.0,
        }
    );
    assert_eq!(auction.view().highest_bidder, Bidder::Nobody);

    let outcome = auction.place_bid(12.5, 3);
    assert_eq!(
        outcome,
        BidOutcome::Accepted {
            auction_id: 7,
            amount: 12.5,
            bidder: 3,
            new_minimum: minimum_next_bid(12.5),
        }
    );

    let view = auction.view();
    assert_eq!(view.current_bid, 12.5);
    assert_eq!(view.highest_bidder, Bidder::Client(3));
    assert_eq!(view.minimum_next_bid, minimum_next_bid(12.5));

    // a lower bid that would have cleared the old minimum is no good anymore
    assert!(matches!(auction.place_bid(12.1, 4), BidOutcome::Rejected { .. }));
    assert_eq!(auction.view().current_bid, 12.5);
}

#[test]
fn bids_without_a_finite_minimum_are_refused() {
    assert!(is_valid_amount(2.8e38));
    for amount in [3e38, Amount::MAX, Amount::INFINITY, Amount::NAN, -3e38] {
        assert!(!is_valid_amount(amount), "{amount}");
        assert!(!is_acceptable(amount, 50.0), "{amount}");
    }

    let mut auction = Auction::new(1, "Antique Vase", 50.0);
    assert!(matches!(auction.place_bid(3e38, 2), BidOutcome::Rejected { .. }));
    assert_eq!(auction.view().current_bid, 50.0);
    assert_eq!(auction.view().highest_bidder, Bidder::Nobody);
}
