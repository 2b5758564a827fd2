//! Capability catalog built on the `fake` crate.
//!
//! [`build_catalog`] wraps the locale-generic fakers into a [`Namespace`]
//! tree addressed with the familiar `namespace.method` paths
//! (`person.fullName`, `internet.ipv4`, `location.city`, ...). Generators
//! that would need caller-supplied arguments are registered too, but fail
//! with [`GenerationFailure::RequiresArguments`] when invoked bare.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, SecondsFormat, Utc};
use fake::faker::{
    address::raw as address, barcode::raw as barcode, company::raw as company,
    creditcard::raw as creditcard, currency::raw as currency, filesystem::raw as filesystem,
    internet::raw as internet, job::raw as job, lorem::raw as lorem, name::raw as name,
    phone_number::raw as phone,
};
use fake::locales::Data;
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::{json, Value};

use super::provider::{Capability, Generated, Generator, Leaf, Namespace};

const HUMAN_COLORS: &[&str] = &[
    "red", "green", "blue", "yellow", "purple", "mint green", "teal", "white", "black",
    "orange", "pink", "grey", "maroon", "violet", "turquoise", "tan", "sky blue", "salmon",
    "plum", "orchid", "olive", "magenta", "lime", "ivory", "indigo", "gold", "fuchsia", "cyan",
    "azure", "lavender", "silver",
];

const DOGS: &[&str] = &[
    "Beagle", "Border Collie", "Boxer", "Dachshund", "Dalmatian", "German Shepherd",
    "Golden Retriever", "Greyhound", "Labrador Retriever", "Poodle", "Pug", "Shiba Inu",
    "Siberian Husky", "Whippet",
];

const CATS: &[&str] = &[
    "Abyssinian", "Bengal", "Birman", "British Shorthair", "Maine Coon", "Norwegian Forest Cat",
    "Persian", "Ragdoll", "Russian Blue", "Siamese", "Sphynx",
];

const ANIMAL_TYPES: &[&str] = &[
    "dog", "cat", "snake", "bear", "lion", "cetacean", "insect", "crocodilia", "cow", "bird",
    "fish", "rabbit", "horse",
];

const SEXES: &[&str] = &["female", "male"];

const ZODIAC_SIGNS: &[&str] = &[
    "Aquarius", "Pisces", "Aries", "Taurus", "Gemini", "Cancer", "Leo", "Virgo", "Libra",
    "Scorpio", "Sagittarius", "Capricorn",
];

const MONTHS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const WEEKDAYS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];

const DB_COLUMNS: &[&str] = &[
    "id", "title", "name", "email", "phone", "token", "group", "category", "password",
    "comment", "avatar", "status", "createdAt", "updatedAt",
];

const DB_TYPES: &[&str] = &[
    "int", "varchar", "text", "date", "datetime", "timestamp", "boolean", "decimal", "float",
    "double", "json", "binary", "uuid", "bigint",
];

const DB_ENGINES: &[&str] = &["InnoDB", "MyISAM", "MEMORY", "CSV", "BLACKHOLE", "ARCHIVE"];

const VEHICLE_MANUFACTURERS: &[&str] = &[
    "Audi", "BMW", "Bugatti", "Ford", "Honda", "Hyundai", "Kia", "Mazda", "Mercedes Benz",
    "Nissan", "Porsche", "Tesla", "Toyota", "Volkswagen", "Volvo",
];

const VEHICLE_TYPES: &[&str] = &[
    "Cargo Van", "Convertible", "Coupe", "Crew Cab Pickup", "Hatchback", "Minivan", "Sedan",
    "SUV", "Wagon",
];

const FUELS: &[&str] = &["Diesel", "Electric", "Gasoline", "Hybrid"];

const MUSIC_GENRES: &[&str] = &[
    "Blues", "Classical", "Country", "Electronic", "Folk", "Hip Hop", "Jazz", "Latin", "Metal",
    "Pop", "Reggae", "Rock", "Soul", "World",
];

const SONG_NAMES: &[&str] = &[
    "Amazing Grace", "Auld Lang Syne", "Danny Boy", "Greensleeves", "Home on the Range",
    "Jingle Bells", "My Bonnie Lies over the Ocean", "Oh! Susanna", "Scarborough Fair",
    "Shenandoah", "Swing Low, Sweet Chariot", "The Entertainer", "When the Saints Go Marching In",
    "Yankee Doodle",
];

const LANGUAGES: &[&str] = &[
    "Arabic", "Bengali", "Chinese", "Dutch", "English", "French", "German", "Hindi",
    "Indonesian", "Italian", "Japanese", "Korean", "Polish", "Portuguese", "Russian",
    "Spanish", "Swahili", "Turkish", "Vietnamese",
];

const BOOK_TITLES: &[&str] = &[
    "Pride and Prejudice", "Moby-Dick", "Frankenstein", "Dracula", "Jane Eyre",
    "Wuthering Heights", "Great Expectations", "War and Peace", "Crime and Punishment",
    "The Odyssey", "Don Quixote", "Little Women", "The Time Machine", "Middlemarch",
    "Alice's Adventures in Wonderland", "The Count of Monte Cristo",
];

const BOOK_GENRES: &[&str] = &[
    "Adventure", "Biography", "Fantasy", "Historical Fiction", "Horror", "Mystery", "Poetry",
    "Romance", "Science Fiction", "Thriller",
];

const BOOK_FORMATS: &[&str] = &["Audiobook", "Hardcover", "Paperback", "Ebook"];

const BIO_SUFFIXES: &[&str] = &[
    "enthusiast", "fan", "lover", "junkie", "advocate", "supporter", "devotee",
];

/// Uniformly pick one entry of a non-empty constant list
fn pick(list: &[&str], rng: &mut dyn RngCore) -> String {
    list.choose(rng).copied().unwrap_or_default().to_string()
}

fn text<F>(f: F) -> Capability
where
    F: Fn(&mut dyn RngCore) -> String + Send + Sync + 'static,
{
    Capability::generator(move |rng| Ok(Generated::text(f(rng))))
}

fn json_value<F>(f: F) -> Capability
where
    F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
{
    Capability::generator(move |rng| Ok(Generated::Json(f(rng))))
}

fn one_of(list: &'static [&'static str]) -> Capability {
    text(move |rng| pick(list, rng))
}

fn needs_arguments() -> Capability {
    Capability::Leaf(Leaf::Generator(Generator::requiring_arguments()))
}

fn random_string(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

fn random_hex(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}

/// ISO-8601 timestamp `offset_secs` away from now
fn timestamp(offset_secs: i64) -> String {
    (Utc::now() + Duration::seconds(offset_secs)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn jwt(rng: &mut dyn RngCore) -> String {
    let iat = Utc::now().timestamp() - rng.gen_range(0..86_400i64);
    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let payload = json!({
        "iat": iat,
        "exp": iat + 3_600,
        "nbf": iat,
        "sub": random_string(rng, 12),
        "jti": random_hex(rng, 32),
    });
    let mut signature = [0u8; 32];
    rng.fill_bytes(&mut signature);
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload.to_string()),
        URL_SAFE_NO_PAD.encode(signature)
    )
}

fn uuid(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

/// Build the full capability tree for one locale
pub fn build_catalog<L>(l: L, label: &str) -> Namespace
where
    L: Data + Copy + Send + Sync + 'static,
{
    let label = label.to_string();
    Namespace::new()
        .namespace("person", |ns| {
            ns.with("firstName", text(move |rng| name::FirstName(l).fake_with_rng(rng)))
                .with("lastName", text(move |rng| name::LastName(l).fake_with_rng(rng)))
                .with("fullName", text(move |rng| name::Name(l).fake_with_rng(rng)))
                .with("prefix", text(move |rng| name::Title(l).fake_with_rng(rng)))
                .with("suffix", text(move |rng| name::Suffix(l).fake_with_rng(rng)))
                .with("sex", one_of(SEXES))
                .with("zodiacSign", one_of(ZODIAC_SIGNS))
                .with("jobTitle", text(move |rng| job::Title(l).fake_with_rng(rng)))
                .with("jobArea", text(move |rng| job::Field(l).fake_with_rng(rng)))
                .with("jobType", text(move |rng| job::Position(l).fake_with_rng(rng)))
                .with("jobDescriptor", text(move |rng| job::Seniority(l).fake_with_rng(rng)))
                .with("bio", text(move |rng| bio(l, rng)))
        })
        .namespace("internet", |ns| {
            ns.with("email", text(move |rng| internet::FreeEmail(l).fake_with_rng(rng)))
                .with("exampleEmail", text(move |rng| internet::SafeEmail(l).fake_with_rng(rng)))
                .with("username", text(move |rng| internet::Username(l).fake_with_rng(rng)))
                .with(
                    "password",
                    text(move |rng| internet::Password(l, 15..16).fake_with_rng(rng)),
                )
                .with("ipv4", text(move |rng| internet::IPv4(l).fake_with_rng(rng)))
                .with("ipv6", text(move |rng| internet::IPv6(l).fake_with_rng(rng)))
                .with("mac", text(move |rng| internet::MACAddress(l).fake_with_rng(rng)))
                .with("userAgent", text(move |rng| internet::UserAgent(l).fake_with_rng(rng)))
                .with(
                    "domainSuffix",
                    text(move |rng| internet::DomainSuffix(l).fake_with_rng(rng)),
                )
                .with("domainName", text(move |rng| domain_name(l, rng)))
                .with(
                    "url",
                    text(move |rng| format!("https://{}/", domain_name(l, rng))),
                )
                .with("httpMethod", one_of(HTTP_METHODS))
                .with("port", json_value(|rng| json!(rng.gen_range(0..=65_535u32))))
                .with("jwt", text(jwt))
        })
        .namespace("location", |ns| {
            ns.with("city", text(move |rng| address::CityName(l).fake_with_rng(rng)))
                .with("country", text(move |rng| address::CountryName(l).fake_with_rng(rng)))
                .with(
                    "countryCode",
                    text(move |rng| address::CountryCode(l).fake_with_rng(rng)),
                )
                .with("street", text(move |rng| address::StreetName(l).fake_with_rng(rng)))
                .with(
                    "streetAddress",
                    text(move |rng| {
                        let number: String = address::BuildingNumber(l).fake_with_rng(rng);
                        let street: String = address::StreetName(l).fake_with_rng(rng);
                        format!("{number} {street}")
                    }),
                )
                .with(
                    "buildingNumber",
                    text(move |rng| address::BuildingNumber(l).fake_with_rng(rng)),
                )
                .with(
                    "secondaryAddress",
                    text(move |rng| address::SecondaryAddress(l).fake_with_rng(rng)),
                )
                .with("state", text(move |rng| address::StateName(l).fake_with_rng(rng)))
                .with("stateAbbr", text(move |rng| address::StateAbbr(l).fake_with_rng(rng)))
                .with("zipCode", text(move |rng| address::ZipCode(l).fake_with_rng(rng)))
                .with("timeZone", text(move |rng| address::TimeZone(l).fake_with_rng(rng)))
                .with("language", one_of(LANGUAGES))
                .with(
                    "latitude",
                    json_value(|rng| Value::from(rng.gen_range(-90.0..=90.0f64))),
                )
                .with(
                    "longitude",
                    json_value(|rng| Value::from(rng.gen_range(-180.0..=180.0f64))),
                )
        })
        .namespace("phone", |ns| {
            ns.with("number", text(move |rng| phone::PhoneNumber(l).fake_with_rng(rng)))
                .with("cellNumber", text(move |rng| phone::CellNumber(l).fake_with_rng(rng)))
        })
        .namespace("company", |ns| {
            ns.with("name", text(move |rng| company::CompanyName(l).fake_with_rng(rng)))
                .with(
                    "catchPhrase",
                    text(move |rng| {
                        let head: String = company::Buzzword(l).fake_with_rng(rng);
                        let middle: String = company::BuzzwordMiddle(l).fake_with_rng(rng);
                        let tail: String = company::BuzzwordTail(l).fake_with_rng(rng);
                        format!("{head} {middle} {tail}")
                    }),
                )
                .with("buzzPhrase", text(move |rng| company::Bs(l).fake_with_rng(rng)))
                .with("buzzVerb", text(move |rng| company::BsVerb(l).fake_with_rng(rng)))
                .with("buzzAdjective", text(move |rng| company::BsAdj(l).fake_with_rng(rng)))
                .with("buzzNoun", text(move |rng| company::BsNoun(l).fake_with_rng(rng)))
                .with("industry", text(move |rng| company::Industry(l).fake_with_rng(rng)))
                .with(
                    "profession",
                    text(move |rng| company::Profession(l).fake_with_rng(rng)),
                )
        })
        .namespace("lorem", |ns| {
            ns.with("word", text(move |rng| lorem::Word(l).fake_with_rng(rng)))
                .with(
                    "words",
                    text(move |rng| {
                        let words: Vec<String> = lorem::Words(l, 3..4).fake_with_rng(rng);
                        words.join(" ")
                    }),
                )
                .with(
                    "sentence",
                    text(move |rng| lorem::Sentence(l, 3..11).fake_with_rng(rng)),
                )
                .with(
                    "sentences",
                    text(move |rng| {
                        let sentences: Vec<String> = lorem::Sentences(l, 2..7).fake_with_rng(rng);
                        sentences.join(" ")
                    }),
                )
                .with(
                    "paragraph",
                    text(move |rng| lorem::Paragraph(l, 3..4).fake_with_rng(rng)),
                )
                .with(
                    "paragraphs",
                    text(move |rng| {
                        let paragraphs: Vec<String> =
                            lorem::Paragraphs(l, 3..4).fake_with_rng(rng);
                        paragraphs.join("\n")
                    }),
                )
        })
        .namespace("finance", |ns| {
            ns.with(
                "creditCardNumber",
                text(move |rng| creditcard::CreditCardNumber(l).fake_with_rng(rng)),
            )
            .with("currencyCode", text(move |rng| currency::CurrencyCode(l).fake_with_rng(rng)))
            .with("currencyName", text(move |rng| currency::CurrencyName(l).fake_with_rng(rng)))
            .with(
                "currencySymbol",
                text(move |rng| currency::CurrencySymbol(l).fake_with_rng(rng)),
            )
            .with(
                "amount",
                text(|rng| format!("{:.2}", rng.gen_range(0.0..1000.0f64))),
            )
            .with(
                "accountNumber",
                text(|rng| (0..8).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()),
            )
        })
        .namespace("commerce", |ns| {
            ns.with("isbn", text(move |rng| barcode::Isbn13(l).fake_with_rng(rng)))
                .with("isbn10", text(move |rng| barcode::Isbn10(l).fake_with_rng(rng)))
                .with("price", text(|rng| format!("{:.2}", rng.gen_range(1.0..1000.0f64))))
        })
        .namespace("system", |ns| {
            ns.with("fileName", text(move |rng| filesystem::FileName(l).fake_with_rng(rng)))
                .with(
                    "fileExt",
                    text(move |rng| filesystem::FileExtension(l).fake_with_rng(rng)),
                )
                .with("filePath", text(move |rng| filesystem::FilePath(l).fake_with_rng(rng)))
                .with(
                    "directoryPath",
                    text(move |rng| filesystem::DirPath(l).fake_with_rng(rng)),
                )
                .with("mimeType", text(move |rng| filesystem::MimeType(l).fake_with_rng(rng)))
                .with("semver", text(move |rng| filesystem::Semver(l).fake_with_rng(rng)))
        })
        .namespace("string", |ns| {
            ns.with("uuid", text(uuid))
                .with("alpha", text(|rng| {
                    let c = rng.gen_range(b'a'..=b'z');
                    char::from(c).to_string()
                }))
                .with("numeric", text(|rng| rng.gen_range(0..10u8).to_string()))
                .with("alphanumeric", text(|rng| random_string(rng, 1)))
                .with("nanoid", text(|rng| random_string(rng, 21)))
                .with("fromCharacters", needs_arguments())
        })
        .namespace("number", |ns| {
            ns.with(
                "int",
                json_value(|rng| json!(rng.gen_range(0..=9_007_199_254_740_991i64))),
            )
            .with("float", json_value(|rng| Value::from(rng.gen::<f64>())))
            .with(
                "bigInt",
                Capability::generator(|rng| Ok(Generated::BigInt(i128::from(rng.gen::<u64>())))),
            )
        })
        .namespace("datatype", |ns| {
            ns.with("boolean", json_value(|rng| Value::Bool(rng.gen_bool(0.5))))
        })
        .namespace("date", |ns| {
            ns.with("past", text(|rng| timestamp(-rng.gen_range(1..=365 * 86_400i64))))
                .with("future", text(|rng| timestamp(rng.gen_range(1..=365 * 86_400i64))))
                .with("recent", text(|rng| timestamp(-rng.gen_range(1..=86_400i64))))
                .with("soon", text(|rng| timestamp(rng.gen_range(1..=86_400i64))))
                .with(
                    "anytime",
                    text(|rng| timestamp(rng.gen_range(-365 * 86_400..=365 * 86_400i64))),
                )
                .with(
                    "birthdate",
                    text(|rng| timestamp(-rng.gen_range(18 * 365 * 86_400..=80 * 365 * 86_400i64))),
                )
                .with("month", one_of(MONTHS))
                .with("weekday", one_of(WEEKDAYS))
                .with("between", needs_arguments())
                .with("betweens", needs_arguments())
        })
        .namespace("database", |ns| {
            ns.with("mongodbObjectId", text(|rng| random_hex(rng, 24)))
                .with("column", one_of(DB_COLUMNS))
                .with("type", one_of(DB_TYPES))
                .with("engine", one_of(DB_ENGINES))
        })
        .namespace("color", |ns| {
            ns.with("human", one_of(HUMAN_COLORS))
                .with("rgb", text(|rng| format!("#{}", random_hex(rng, 6))))
        })
        .namespace("animal", |ns| {
            ns.with("dog", one_of(DOGS))
                .with("cat", one_of(CATS))
                .with("type", one_of(ANIMAL_TYPES))
        })
        .namespace("vehicle", |ns| {
            ns.with("manufacturer", one_of(VEHICLE_MANUFACTURERS))
                .with("type", one_of(VEHICLE_TYPES))
                .with("fuel", one_of(FUELS))
                .with(
                    "vin",
                    text(|rng| random_string(rng, 17).to_uppercase()),
                )
        })
        .namespace("music", |ns| {
            ns.with("genre", one_of(MUSIC_GENRES))
                .with("songName", one_of(SONG_NAMES))
        })
        .namespace("book", |ns| {
            ns.with("title", one_of(BOOK_TITLES))
                .with("author", text(move |rng| name::Name(l).fake_with_rng(rng)))
                .with("genre", one_of(BOOK_GENRES))
                .with("format", one_of(BOOK_FORMATS))
                .with("publisher", text(move |rng| company::CompanyName(l).fake_with_rng(rng)))
        })
        .namespace("image", |ns| {
            ns.with(
                "avatar",
                text(|rng| {
                    format!(
                        "https://avatars.githubusercontent.com/u/{}",
                        rng.gen_range(1..100_000_000u32)
                    )
                }),
            )
            .with(
                "url",
                text(|rng| {
                    let seed = random_string(rng, 8);
                    let w = rng.gen_range(1..=4) * 320;
                    let h = rng.gen_range(1..=4) * 240;
                    format!("https://picsum.photos/seed/{seed}/{w}/{h}")
                }),
            )
        })
        .namespace("helpers", |ns| {
            ns.with("arrayElement", needs_arguments())
                .with("slugify", needs_arguments())
                .with("fake", needs_arguments())
        })
        .namespace("meta", |ns| {
            ns.with("locale", Capability::constant(Value::String(label)))
        })
}

/// `"<job field> <seniority>, <word> <suffix>"`, e.g. `"Marketing junior, coffee fan"`
fn bio<L: Data + Copy>(l: L, rng: &mut dyn RngCore) -> String {
    let field: String = job::Field(l).fake_with_rng(rng);
    let seniority: String = job::Seniority(l).fake_with_rng(rng);
    let word: String = lorem::Word(l).fake_with_rng(rng);
    format!("{field} {}, {word} {}", seniority.to_lowercase(), pick(BIO_SUFFIXES, rng))
}

fn domain_name<L: Data + Copy>(l: L, rng: &mut dyn RngCore) -> String {
    let word: String = lorem::Word(l).fake_with_rng(rng);
    let suffix: String = internet::DomainSuffix(l).fake_with_rng(rng);
    format!("{}.{}", word.to_lowercase(), suffix)
}
