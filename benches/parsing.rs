//! Benchmarks for IRC line parsing and building.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slirc_ws::{Command, IrcParser, IrcV3Parser, Message, Prefix, Rfc1459Parser, TaggedMessage};

/// Keepalive from Twitch
const SIMPLE_MESSAGE: &str = "PING :tmi.twitch.tv\r\n";

/// Message with prefix
const PREFIX_MESSAGE: &str = ":nick!user@host PRIVMSG #channel :Hello, world!\r\n";

/// Numeric reply
const NUMERIC_RESPONSE: &str = ":tmi.twitch.tv 002 justinfan123 :Your host is tmi.twitch.tv\r\n";

/// Twitch chat message with a full tag section
const TAGGED_MESSAGE: &str = "@badge-info=;badges=broadcaster/1;color=#0000FF;display-name=ronni;emotes=;id=db25007f-7a18-43eb-9379-80131e44d633;mod=0;room-id=1337;subscriber=0;tmi-sent-ts=1507246572675;turbo=1;user-id=1337;user-type=global_mod :ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #ronni :Kappa Keepo Kappa\r\n";

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Parsing");
    let v3 = IrcV3Parser::default();

    for (name, line) in [
        ("simple_ping", SIMPLE_MESSAGE),
        ("with_prefix", PREFIX_MESSAGE),
        ("numeric_response", NUMERIC_RESPONSE),
    ] {
        group.bench_with_input(BenchmarkId::new("rfc1459", name), line, |b, line| {
            b.iter(|| black_box(Rfc1459Parser.parse_message(black_box(line)).unwrap()))
        });
    }

    group.bench_function("ircv3_tagged", |b| {
        b.iter(|| black_box(v3.parse_message(black_box(TAGGED_MESSAGE)).unwrap()))
    });

    group.bench_function("ircv3_untagged", |b| {
        b.iter(|| black_box(v3.parse_message(black_box(PREFIX_MESSAGE)).unwrap()))
    });

    group.finish();
}

fn benchmark_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Building");

    let numeric: Message = NUMERIC_RESPONSE.parse().unwrap();
    let tagged: TaggedMessage = TAGGED_MESSAGE.parse().unwrap();
    let v3 = IrcV3Parser::default();

    group.bench_function("numeric_by_code", |b| {
        b.iter(|| black_box(Rfc1459Parser.build_message(Some(black_box(&numeric)), true)))
    });

    group.bench_function("numeric_by_name", |b| {
        b.iter(|| black_box(Rfc1459Parser.build_message(Some(black_box(&numeric)), false)))
    });

    group.bench_function("tagged", |b| {
        b.iter(|| black_box(v3.build_message(Some(black_box(&tagged)), false)))
    });

    group.bench_function("construct_privmsg", |b| {
        b.iter(|| {
            let msg = Message::new(Command::PRIVMSG, [black_box("#channel"), black_box(":Hello!")])
                .with_prefix(Prefix::user("nick", Some("user"), Some("host")));
            black_box(msg)
        })
    });

    group.finish();
}

fn benchmark_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("Round Trip");
    let v3 = IrcV3Parser::default();

    for (name, line) in [
        ("simple", SIMPLE_MESSAGE),
        ("prefix", PREFIX_MESSAGE),
        ("numeric", NUMERIC_RESPONSE),
        ("tagged", TAGGED_MESSAGE),
    ] {
        group.bench_with_input(BenchmarkId::new("parse_build", name), line, |b, line| {
            b.iter(|| {
                let msg = v3.parse_message(black_box(line)).unwrap();
                black_box(v3.build_message(Some(&msg), true))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_building,
    benchmark_round_trip,
);

criterion_main!(benches);
