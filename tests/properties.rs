use mantissa::*;
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 1024;

#[derive(Debug, Clone)]
enum Op {
    ShiftLeft,
    ShiftRight,
    Normalize,
    Add(u128),
    Subtract(u128),
}

fn ops(limit: u128) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        Just(Op::ShiftLeft),
        Just(Op::ShiftRight),
        Just(Op::Normalize),
        (0..limit).prop_map(Op::Add),
        (0..limit).prop_map(Op::Subtract),
    ];
    prop::collection::vec(op, 0..16)
}

fn apply(m: &mut Mantissa, op: &Op) {
    let format = *m.format();
    match op {
        Op::ShiftLeft => {
            m.shift_left(BitGrid::Regular);
        }
        Op::ShiftRight => {
            m.shift_right(BitGrid::Regular);
        }
        Op::Normalize => {
            m.normalize();
        }
        Op::Add(v) => {
            m.add(&Mantissa::new(*v, format));
        }
        Op::Subtract(v) => {
            m.subtract(&Mantissa::new(*v, format));
        }
    }
}

/// Every format that fits the mantissa register, built as `digit_width * digits`.
fn formats() -> impl Strategy<Value = Format> {
    (1usize..=16, any::<bool>())
        .prop_flat_map(|(width, hidden)| (Just(width), 1..=16 / width, Just(hidden)))
        .prop_filter_map("no room for the hidden one", |(width, digits, hidden)| {
            Format::new(width * digits, width, hidden).ok()
        })
}

/// Largest input that still fits the stored field, plus the leading digit
/// when it is hidden.
fn limit(format: &Format) -> u128 {
    let hidden = if format.hidden_one() { format.digit_width() } else { 0 };
    1 << (format.bits_used() + hidden)
}

fn trail(m: &Mantissa) -> u128 {
    m.register().to_num() & ((1 << m.zero_trail_width()) - 1)
}

fn bit_length(v: u128) -> u32 {
    128 - v.leading_zeros()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn explicit_leading_digit_is_nonzero(v in 1u128..(1 << 12)) {
        let m = Mantissa::new(v, Format::F1);
        prop_assert_ne!(m.number() & 0xf00, 0);
        // normalizing only ever shifts in whole digits
        prop_assert!((0..3).any(|s| m.number() == v << (4 * s)));
    }

    #[test]
    fn hidden_one_is_recovered(v in 1u128..(1 << 12)) {
        let m = Mantissa::new(v, Format::F2);
        prop_assert_ne!(m.number() & 0x800, 0);
        if v >= 0x800 {
            prop_assert_eq!(m.number(), v);
        } else {
            prop_assert_eq!(m.number(), v << (12 - bit_length(v)));
        }
    }

    #[test]
    fn reading_number_is_idempotent(v in 0u128..(1 << 12), hidden: bool) {
        let format = if hidden { Format::F2 } else { Format::F1 };
        let m = Mantissa::new(v, format);
        let raw = m.raw();
        let first = m.number();
        prop_assert_eq!(&m.raw(), &raw);
        prop_assert_eq!(m.number(), first);
        prop_assert_eq!(&m.raw(), &raw);
    }

    #[test]
    fn shift_left_then_right_restores(v in 0u128..(1 << 12), hidden: bool) {
        let format = if hidden { Format::F2 } else { Format::F1 };
        let mut m = Mantissa::new(v, format);
        // clear the top digit so the left shift drops nothing
        m.shift_right(BitGrid::Regular);
        let raw = m.raw();
        m.shift_left(BitGrid::Regular).shift_right(BitGrid::Regular);
        prop_assert_eq!(m.raw(), raw);
    }

    #[test]
    fn trail_stays_zero(v in 0u128..(1 << 12), hidden: bool, ops in ops(1 << 12)) {
        let format = if hidden { Format::F2 } else { Format::F1 };
        let mut m = Mantissa::new(v, format);
        prop_assert_eq!(trail(&m), 0);
        for op in &ops {
            apply(&mut m, op);
            prop_assert_eq!(trail(&m), 0, "after {:?}", op);
        }
    }

    #[test]
    fn borrow_yields_magnitude(a in 1u128..(1 << 12), b in 1u128..(1 << 12)) {
        let mut x = Mantissa::new(a, Format::F1);
        let y = Mantissa::new(b, Format::F1);
        let (minuend, subtrahend) = (x.register().to_num(), y.register().to_num());
        let borrow = x.subtract(&y);
        prop_assert_eq!(borrow, minuend < subtrahend);

        let difference = (minuend as i128 - subtrahend as i128) as u16 as i16;
        prop_assert_eq!(x.register().to_num(), if borrow {
            (difference as i32).abs() as u128 & 0xffff
        } else {
            difference as u16 as u128
        });
    }

    #[test]
    fn normalize_counts_leading_zero_digits(v in 1u128..(1 << 12), k in 0usize..3) {
        let mut m = Mantissa::new(v, Format::F1);
        for _ in 0..k {
            m.shift_right(BitGrid::Regular);
        }
        let leading = (0..3).take_while(|i| m.number() >> (8 - 4 * i) & 0xf == 0).count();
        prop_assert_eq!(m.normalize(), leading);
        prop_assert_ne!(m.number() & 0xf00, 0);
    }

    #[test]
    fn leading_digit_is_nonzero_in_any_format(
        (format, v) in formats().prop_flat_map(|f| (Just(f), 1..limit(&f)))
    ) {
        let m = Mantissa::new(v, format);
        let (bits_used, digit_width) = (format.bits_used(), format.digit_width());
        if format.hidden_one() {
            // the recovered leading digit is a one, read on the extended grid
            prop_assert_eq!(m.number() >> (bits_used - digit_width + 1), 1);
        } else {
            prop_assert_ne!(m.number() >> (bits_used - digit_width), 0);
            prop_assert!(m.number() < 1 << bits_used);
        }
    }

    #[test]
    fn trail_stays_zero_in_any_format(
        (format, v, ops) in formats().prop_flat_map(|f| (Just(f), 0..limit(&f), ops(limit(&f))))
    ) {
        let mut m = Mantissa::new(v, format);
        prop_assert_eq!(m.zero_trail_width(), 16 - format.bits_used());
        prop_assert_eq!(trail(&m), 0);
        for op in &ops {
            apply(&mut m, op);
            prop_assert_eq!(trail(&m), 0, "after {:?} in {:?}", op, format);
        }
    }
}
