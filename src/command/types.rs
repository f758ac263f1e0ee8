//! The command and reply table.
//!
//! Every identifier maps to exactly one wire name, and replies additionally
//! map to exactly one three-digit numeric code. Commands have no numeric form.
//!
//! # Reference
//! - RFC 1459: Internet Relay Chat Protocol, sections 4 and 6
//! - IRCv3 `sasl-3.1`: numerics 900-908

#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

macro_rules! command_table {
    (
        commands { $($cmd:ident),* $(,)? }
        replies { $($reply:ident = $code:literal),* $(,)? }
    ) => {
        /// A command or reply identifier resolved from the wire.
        ///
        /// Names that are not in the table resolve to [`Command::Unknown`];
        /// resolution never fails.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum Command {
            /// Unresolved command, bound to name `UNKNOWN` and code 0.
            #[default]
            Unknown,
            $(
                #[doc = concat!("`", stringify!($cmd), "` command.")]
                $cmd,
            )*
            $(
                #[doc = concat!("Numeric reply ", stringify!($code), ".")]
                $reply,
            )*
        }

        impl Command {
            /// Every identifier in the table, `Unknown` first.
            pub const ALL: &'static [Command] = &[
                Command::Unknown,
                $(Command::$cmd,)*
                $(Command::$reply,)*
            ];

            /// The symbolic wire name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    Command::Unknown => "UNKNOWN",
                    $(Command::$cmd => stringify!($cmd),)*
                    $(Command::$reply => stringify!($reply),)*
                }
            }

            /// The numeric code, if this identifier has one.
            pub fn numeric(&self) -> Option<u16> {
                match self {
                    Command::Unknown => Some(0),
                    $(Command::$reply => Some($code),)*
                    _ => None,
                }
            }

            /// Resolve a symbolic name. Matching is exact and case-sensitive.
            pub fn from_name(name: &str) -> Command {
                match name {
                    $(stringify!($cmd) => Command::$cmd,)*
                    $(stringify!($reply) => Command::$reply,)*
                    _ => Command::Unknown,
                }
            }

            /// Resolve a numeric code.
            pub fn from_numeric(code: u16) -> Command {
                match code {
                    $($code => Command::$reply,)*
                    _ => Command::Unknown,
                }
            }
        }
    };
}

command_table! {
    commands {
        PASS, NICK, USER, SERVER, OPER, QUIT, SQUIT,
        JOIN, PART, MODE, TOPIC, NAMES, LIST, INVITE, KICK,
        VERSION, STATS, LINKS, TIME, CONNECT, TRACE, ADMIN, INFO, MOTD, LUSERS,
        PRIVMSG, NOTICE,
        WHO, WHOIS, WHOWAS,
        KILL, PING, PONG, ERROR,
        AWAY, REHASH, RESTART, SUMMON, USERS, WALLOPS, USERHOST, ISON, HELP,
        CAP, AUTHENTICATE,
    }
    replies {
        RPL_WELCOME = 1,
        RPL_YOURHOST = 2,
        RPL_CREATED = 3,
        RPL_MYINFO = 4,
        RPL_BOUNCE = 5,
        RPL_TRACELINK = 200,
        RPL_TRACECONNECTING = 201,
        RPL_TRACEHANDSHAKE = 202,
        RPL_TRACEUNKNOWN = 203,
        RPL_TRACEOPERATOR = 204,
        RPL_TRACEUSER = 205,
        RPL_TRACESERVER = 206,
        RPL_TRACESERVICE = 207,
        RPL_TRACENEWTYPE = 208,
        RPL_TRACECLASS = 209,
        RPL_TRACERECONNECT = 210,
        RPL_STATSLINKINFO = 211,
        RPL_STATSCOMMANDS = 212,
        RPL_STATSCLINE = 213,
        RPL_STATSNLINE = 214,
        RPL_STATSILINE = 215,
        RPL_STATSKLINE = 216,
        RPL_STATSQLINE = 217,
        RPL_STATSYLINE = 218,
        RPL_ENDOFSTATS = 219,
        RPL_UMODEIS = 221,
        RPL_SERVICEINFO = 231,
        RPL_ENDOFSERVICES = 232,
        RPL_SERVICE = 233,
        RPL_SERVLIST = 234,
        RPL_SERVLISTEND = 235,
        RPL_STATSVLINE = 240,
        RPL_STATSLLINE = 241,
        RPL_STATSUPTIME = 242,
        RPL_STATSOLINE = 243,
        RPL_STATSHLINE = 244,
        RPL_STATSPING = 246,
        RPL_STATSBLINE = 247,
        RPL_STATSDLINE = 250,
        RPL_LUSERCLIENT = 251,
        RPL_LUSEROP = 252,
        RPL_LUSERUNKNOWN = 253,
        RPL_LUSERCHANNELS = 254,
        RPL_LUSERME = 255,
        RPL_ADMINME = 256,
        RPL_ADMINLOC1 = 257,
        RPL_ADMINLOC2 = 258,
        RPL_ADMINEMAIL = 259,
        RPL_TRACELOG = 261,
        RPL_TRACEEND = 262,
        RPL_TRYAGAIN = 263,
        RPL_NONE = 300,
        RPL_AWAY = 301,
        RPL_USERHOST = 302,
        RPL_ISON = 303,
        RPL_UNAWAY = 305,
        RPL_NOWAWAY = 306,
        RPL_WHOISUSER = 311,
        RPL_WHOISSERVER = 312,
        RPL_WHOISOPERATOR = 313,
        RPL_WHOWASUSER = 314,
        RPL_ENDOFWHO = 315,
        RPL_WHOISCHANOP = 316,
        RPL_WHOISIDLE = 317,
        RPL_ENDOFWHOIS = 318,
        RPL_WHOISCHANNELS = 319,
        RPL_LISTSTART = 321,
        RPL_LIST = 322,
        RPL_LISTEND = 323,
        RPL_CHANNELMODEIS = 324,
        RPL_UNIQOPIS = 325,
        RPL_NOTOPIC = 331,
        RPL_TOPIC = 332,
        RPL_INVITING = 341,
        RPL_SUMMONING = 342,
        RPL_INVITELIST = 346,
        RPL_ENDOFINVITELIST = 347,
        RPL_EXCEPTLIST = 348,
        RPL_ENDOFEXCEPTLIST = 349,
        RPL_VERSION = 351,
        RPL_WHOREPLY = 352,
        RPL_NAMREPLY = 353,
        RPL_KILLDONE = 361,
        RPL_CLOSING = 362,
        RPL_CLOSEEND = 363,
        RPL_LINKS = 364,
        RPL_ENDOFLINKS = 365,
        RPL_ENDOFNAMES = 366,
        RPL_BANLIST = 367,
        RPL_ENDOFBANLIST = 368,
        RPL_ENDOFWHOWAS = 369,
        RPL_INFO = 371,
        RPL_MOTD = 372,
        RPL_INFOSTART = 373,
        RPL_ENDOFINFO = 374,
        RPL_ENDOFMOTD = 376,
        RPL_YOUREOPER = 381,
        RPL_REHASHING = 382,
        RPL_YOURESERVICE = 383,
        RPL_MYPORTIS = 384,
        RPL_TIME = 391,
        RPL_USERSSTART = 392,
        RPL_USERS = 393,
        RPL_ENDOFUSERS = 394,
        RPL_NOUSERS = 395,
        RPL_MOTDSTART = 375,
        ERR_NOSUCHNICK = 401,
        ERR_NOSUCHSERVER = 402,
        ERR_NOSUCHCHANNEL = 403,
        ERR_CANNOTSENDTOCHAN = 404,
        ERR_TOOMANYCHANNELS = 405,
        ERR_WASNOSUCHNICK = 406,
        ERR_TOOMANYTARGETS = 407,
        ERR_NOSUCHSERVICE = 408,
        ERR_NOORIGIN = 409,
        ERR_NORECIPIENT = 411,
        ERR_NOTEXTTOSEND = 412,
        ERR_NOTOPLEVEL = 413,
        ERR_WILDTOPLEVEL = 414,
        ERR_BADMASK = 415,
        ERR_UNKNOWNCOMMAND = 421,
        ERR_NOMOTD = 422,
        ERR_NOADMININFO = 423,
        ERR_FILEERROR = 424,
        ERR_NONICKNAMEGIVEN = 431,
        ERR_ERRONEUSNICKNAME = 432,
        ERR_NICKNAMEINUSE = 433,
        ERR_NICKCOLLISION = 436,
        ERR_UNAVAILRESOURCE = 437,
        ERR_USERNOTINCHANNEL = 441,
        ERR_NOTONCHANNEL = 442,
        ERR_USERONCHANNEL = 443,
        ERR_NOLOGIN = 444,
        ERR_SUMMONDISABLED = 445,
        ERR_USERSDISABLED = 446,
        ERR_NOTREGISTERED = 451,
        ERR_NEEDMOREPARAMS = 461,
        ERR_ALREADYREGISTRED = 462,
        ERR_NOPERMFORHOST = 463,
        ERR_PASSWDMISMATCH = 464,
        ERR_YOUREBANNEDCREEP = 465,
        ERR_YOUWILLBEBANNED = 466,
        ERR_KEYSET = 467,
        ERR_CHANNELISFULL = 471,
        ERR_UNKNOWNMODE = 472,
        ERR_INVITEONLYCHAN = 473,
        ERR_BANNEDFROMCHAN = 474,
        ERR_BADCHANNELKEY = 475,
        ERR_BADCHANMASK = 476,
        ERR_NOCHANMODES = 477,
        ERR_BANLISTFULL = 478,
        ERR_NOPRIVILEGES = 481,
        ERR_CHANOPRIVSNEEDED = 482,
        ERR_CANTKILLSERVER = 483,
        ERR_RESTRICTED = 484,
        ERR_UNIQOPRIVSNEEDED = 485,
        ERR_NOOPERHOST = 491,
        ERR_NOSERVICEHOST = 492,
        ERR_UMODEUNKNOWNFLAG = 501,
        ERR_USERSDONTMATCH = 502,
        ERR_HELPNOTFOUND = 524,
        RPL_HELPSTART = 704,
        RPL_HELPTXT = 705,
        RPL_ENDOFHELP = 706,
        RPL_LOGGEDIN = 900,
        RPL_LOGGEDOUT = 901,
        ERR_NICKLOCKED = 902,
        RPL_SASLSUCCESS = 903,
        ERR_SASLFAIL = 904,
        ERR_SASLTOOLONG = 905,
        ERR_SASLABORTED = 906,
        ERR_SASLALREADY = 907,
        RPL_SASLMECHS = 908,
    }
}

impl Command {
    /// Resolve a command token as it appears on the wire.
    ///
    /// A token whose first character is a digit and which parses as a
    /// non-negative integer is looked up by numeric code; anything else is
    /// looked up by name.
    pub fn resolve(token: &str) -> Command {
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            if let Ok(code) = token.parse::<u16>() {
                return Command::from_numeric(code);
            }
        }
        Command::from_name(token)
    }

    /// Returns `true` for numeric replies.
    pub fn is_reply(&self) -> bool {
        !matches!(self, Command::Unknown) && self.numeric().is_some()
    }

    /// Returns `true` for `ERR_*` replies.
    pub fn is_error(&self) -> bool {
        self.as_str().starts_with("ERR_")
    }

    /// Write the command the way it goes on the wire.
    ///
    /// With `use_numeric`, identifiers that carry a code are written as three
    /// zero-padded digits; identifiers without one fall back to their name.
    pub fn to_wire(&self, use_numeric: bool) -> String {
        match self.numeric() {
            Some(code) if use_numeric => format!("{:03}", code),
            _ => self.as_str().to_string(),
        }
    }
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Command::resolve(s))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
