use anyhow::Result;
use personnummer_gen::core::checksum::{checksum1, checksum2};
use personnummer_gen::core::era::SequenceRange;
use personnummer_gen::{
    generate, verify, EraPolicy, Generator, OrderingPolicy, PnrError, SkipStage,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn digits_of(number: &str) -> Vec<u8> {
    number.bytes().map(|b| b - b'0').collect()
}

/// 參考範例：1937-02-21 男性，序號 001
#[test]
fn test_reference_example_end_to_end() -> Result<()> {
    let first = generate("1937-02-21", "m")?.next().expect("at least one number");

    assert_eq!(first.to_string(), "21023700163");
    assert!(first.to_string().starts_with("210237"));
    Ok(())
}

/// 每個產生的號碼都能以獨立計算的檢查碼驗證
#[test]
fn test_generated_numbers_recompute_and_verify() -> Result<()> {
    for ordering in [
        OrderingPolicy::SequentialOnce,
        OrderingPolicy::CyclicRepeat,
        OrderingPolicy::UniformRandom,
    ] {
        let generator = Generator::new(EraPolicy::Extended, ordering).with_seed(Some(99));
        for number in generator.generate("1966-09-14", "f")?.take(100) {
            let text = number.to_string();
            assert_eq!(text.len(), 11);

            let digits = digits_of(&text);
            let base: [u8; 9] = digits[..9].try_into()?;
            let k1 = checksum1(&base);
            let k2 = checksum2(&base, k1);
            assert_eq!(digits[9], k1);
            assert_eq!(digits[10], k2);

            let verified = verify(&text)?;
            assert_eq!(verified.to_string(), text);
            assert_eq!(verified.gender(), number.gender());
        }
    }
    Ok(())
}

/// 序號奇偶對應性別
#[test]
fn test_parity_law_holds_for_every_policy() -> Result<()> {
    for era in [EraPolicy::Legacy, EraPolicy::Extended] {
        for (gender, expect_even) in [("f", true), ("m", false)] {
            let all: Vec<String> = Generator::new(era, OrderingPolicy::SequentialOnce)
                .generate("1988-08-08", gender)?
                .map(|n| n.to_string())
                .collect();

            assert!(!all.is_empty());
            for number in all {
                let sequence: u16 = number[6..9].parse()?;
                assert_eq!(sequence % 2 == 0, expect_even, "{} for {}", number, gender);
            }
        }
    }
    Ok(())
}

#[test]
fn test_sequence_numbers_come_from_era_ranges() -> Result<()> {
    let cases: [(&str, EraPolicy, &[SequenceRange]); 4] = [
        ("1899-01-01", EraPolicy::Extended, &[SequenceRange::new(500, 750)]),
        ("1900-01-01", EraPolicy::Legacy, &[SequenceRange::new(0, 500)]),
        (
            "1940-01-01",
            EraPolicy::Extended,
            &[SequenceRange::new(0, 500), SequenceRange::new(900, 1000)],
        ),
        ("2000-01-01", EraPolicy::Extended, &[SequenceRange::new(500, 1000)]),
    ];

    for (date, era, ranges) in cases {
        let numbers = Generator::new(era, OrderingPolicy::SequentialOnce).generate(date, "m")?;
        for number in numbers {
            let sequence = number.sequence().value();
            assert!(
                ranges.iter().any(|r| r.contains(sequence)),
                "{} outside {:?}",
                number,
                ranges
            );
        }
    }
    Ok(())
}

#[test]
fn test_extended_era_reaches_second_range() -> Result<()> {
    let numbers: Vec<u16> = Generator::new(EraPolicy::Extended, OrderingPolicy::SequentialOnce)
        .generate("1975-05-17", "m")?
        .map(|n| n.sequence().value())
        .collect();

    assert!(numbers.iter().any(|s| *s >= 900));
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

/// 無限來源 skip 之後 take(20) 一定剛好 20 筆
#[test]
fn test_take_after_skip_on_infinite_sources() -> Result<()> {
    for ordering in [OrderingPolicy::CyclicRepeat, OrderingPolicy::UniformRandom] {
        for stage in [SkipStage::Raw, SkipStage::Validated] {
            for skip in [0, 1, 499, 5_000] {
                let count = Generator::new(EraPolicy::Legacy, ordering)
                    .with_seed(Some(skip as u64))
                    .generate("1937-02-21", "m")?
                    .skip_at(stage, skip)
                    .take(20)
                    .count();
                assert_eq!(count, 20, "{:?} {:?} skip {}", ordering, stage, skip);
            }
        }
    }
    Ok(())
}

#[test]
fn test_take_on_exhausted_sequential_source_is_short() -> Result<()> {
    let generator = Generator::new(EraPolicy::Legacy, OrderingPolicy::SequentialOnce);
    let total = generator.generate("1850-12-01", "m")?.count();

    let page = generator.page("1850-12-01", "m", total - 3, 20)?;
    assert_eq!(page.len(), 3);

    let beyond = generator.page("1850-12-01", "m", total + 100, 20)?;
    assert!(beyond.is_empty());
    Ok(())
}

#[test]
fn test_cyclic_source_revisits_values() -> Result<()> {
    let generator = Generator::new(EraPolicy::Legacy, OrderingPolicy::CyclicRepeat);
    let total = Generator::new(EraPolicy::Legacy, OrderingPolicy::SequentialOnce)
        .generate("1937-02-21", "m")?
        .count();

    let numbers: Vec<String> = generator
        .generate("1937-02-21", "m")?
        .take(total + 1)
        .map(|n| n.to_string())
        .collect();
    assert_eq!(numbers[0], numbers[total]);
    Ok(())
}

#[test]
fn test_injected_rng_controls_random_order() {
    let generator = Generator::new(EraPolicy::Extended, OrderingPolicy::UniformRandom);
    let date = personnummer_gen::core::BirthDate::parse("2012-10-10").unwrap();
    let gender = personnummer_gen::core::Gender::Female;

    let a: Vec<String> = generator
        .generate_with_rng(date, gender, StdRng::seed_from_u64(1))
        .take(30)
        .map(|n| n.to_string())
        .collect();
    let b: Vec<String> = generator
        .generate_with_rng(date, gender, StdRng::seed_from_u64(1))
        .take(30)
        .map(|n| n.to_string())
        .collect();
    let c: Vec<String> = generator
        .generate_with_rng(date, gender, StdRng::seed_from_u64(2))
        .take(30)
        .map(|n| n.to_string())
        .collect();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_malformed_input_is_reported() {
    assert!(matches!(
        generate("1937/02/21", "m"),
        Err(PnrError::InvalidDate { .. })
    ));
    assert!(matches!(
        generate("1937-02-21", "x"),
        Err(PnrError::InvalidGender { .. })
    ));
}
