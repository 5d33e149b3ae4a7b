//! Property tests for rate resolution over arbitrary sparse tables

use currency_converter::prelude::*;
use currency_converter::conversion::round_half_up;
use currency_converter::fx::RateEntry;
use proptest::prelude::*;

fn currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::ALL.to_vec())
}

fn entries() -> impl Strategy<Value = Vec<RateEntry>> {
    prop::collection::vec(
        (currency(), currency(), 0.001f64..1000.0).prop_map(|(from, to, rate)| RateEntry {
            from,
            to,
            rate,
        }),
        0..30,
    )
}

fn table(entries: &[RateEntry]) -> RateTable {
    let mut builder = RateTable::builder();
    builder.add_rates(entries).unwrap();
    builder.build()
}

proptest! {
    #[test]
    fn direct_entries_resolve_unchanged(entries in entries()) {
        let table = table(&entries);
        let resolver = RateResolver::legacy(&table);
        for entry in table.entries() {
            prop_assert_eq!(resolver.rate(entry.from, entry.to).unwrap(), entry.rate);
        }
    }

    #[test]
    fn reverse_only_entries_resolve_to_reciprocal(entries in entries()) {
        let table = table(&entries);
        let resolver = RateResolver::legacy(&table);
        for entry in table.entries() {
            if table.has_rate(entry.to, entry.from) {
                continue;
            }
            let rate = resolver.rate(entry.to, entry.from).unwrap();
            prop_assert!((rate - 1.0 / entry.rate).abs() <= 1e-9 * (1.0 / entry.rate).max(1.0));
        }
    }

    #[test]
    fn untabulated_pairs_resolve_through_usd(entries in entries(), from in currency(), to in currency()) {
        let table = table(&entries);
        prop_assume!(!table.has_rate(from, to) && !table.has_rate(to, from));

        let resolver = RateResolver::legacy(&table);
        let expected = table.direct_rate(from, Currency::USD).unwrap_or(1.0)
            * table.direct_rate(Currency::USD, to).unwrap_or(1.0);
        prop_assert_eq!(resolver.rate(from, to).unwrap(), expected);
    }

    #[test]
    fn resolved_rates_are_positive(entries in entries(), from in currency(), to in currency()) {
        let resolver = RateResolver::new(table(&entries));
        let rate = resolver.rate(from, to).unwrap();
        prop_assert!(rate > 0.0 && rate.is_finite());
    }

    #[test]
    fn exact_identity_is_one(entries in entries(), currency in currency()) {
        let resolver = RateResolver::new(table(&entries));
        prop_assert_eq!(resolver.rate(currency, currency).unwrap(), 1.0);
    }

    #[test]
    fn converted_amount_has_two_decimals(amount in 0.0f64..1_000_000.0, from in currency(), to in currency()) {
        let resolver = RateResolver::new(RateTable::reference());
        let request = ConversionRequest::new(amount, from, to).unwrap();
        let result = convert(&resolver, &request).unwrap();

        prop_assert_eq!(result.converted_amount, round_half_up(amount * result.effective_rate, 2));
        let display = result.converted_display();
        let (_, fraction) = display.split_once('.').unwrap();
        prop_assert_eq!(fraction.len(), 2);
    }
}
