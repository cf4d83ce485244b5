use crate::{
    commands::{
        command_error::CommandError,
        echo::{echo, EchoArguments},
        expire::{expire, persist, pttl, ttl, ExpireArguments, KeyArgument},
        geo::{
            geoadd, geodist, geopos, geosearch, GeoaddArguments, GeodistArguments,
            GeoposArguments, GeosearchArguments,
        },
        get::{get, GetArguments},
        hashes::{hdel, hget, hgetall, hset, HfieldArguments, HgetallArguments, HsetArguments},
        hyperloglog::{pfadd, pfcount, PfaddArguments, PfcountArguments},
        keyspace::{dbsize, del, exists, flushall, KeysArguments, NoArguments},
        llen::{llen, LlenArguments},
        lpop::{lpop, LpopArguments},
        lrange::{lrange, LrangeArguments},
        ping::{ping, PingArguments},
        pub_sub::PublishArguments,
        rpush_and_lpush::{lpush, rpush, PushArrayOperations},
        set::{set, setex, SetArguments},
        sets::{sadd, scard, sismember, smembers, srem, SetKeyArguments, SetMembersArguments, SismemberArguments},
        sorted_sets::{
            zadd, zcard, zrange, zrem, zscore, ZaddArguments, ZcardArguments, ZmemberArguments,
            ZrangeArguments,
        },
        transactions::{DiscardArguments, ExecArguments, MultiArguments},
        type_command::{type_command, TypeArguments},
        xack::{xack, xpending, XackArguments, XpendingArguments},
        xadd::{xadd, XaddArguments},
        xgroup::{xgroup, XgroupArguments},
        xrange::{xlen, xrange, XlenArguments, XrangeArguments},
        xread::{xread, XreadArguments},
        xreadgroup::{xreadgroup, XreadgroupArguments},
    },
    key_value_store::KeyValueStore,
    reply::Reply,
};

/// Commands that never modify the store and run under the shared lock.
const READ_ONLY_COMMANDS: [&str; 26] = [
    "PING", "ECHO", "GET", "EXISTS", "TTL", "PTTL", "TYPE", "DBSIZE", "LRANGE", "LLEN",
    "SMEMBERS", "SISMEMBER", "SCARD", "ZRANGE", "ZSCORE", "ZCARD", "HGET", "HGETALL", "GEODIST",
    "GEOPOS", "GEOSEARCH", "PFCOUNT", "XLEN", "XRANGE", "XREAD", "XPENDING",
];

/// A stream read that asked to wait for new entries.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockingRequest {
    pub block_ms: u64,
    pub keys: Vec<String>,
}

/// A single command: its upper-cased name and raw arguments.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub name: String,
    pub arguments: Vec<String>,
}

impl CommandHandler {
    pub fn new(name: &str, arguments: Vec<String>) -> Self {
        Self {
            name: name.to_uppercase(),
            arguments,
        }
    }

    pub fn is_read_only(&self) -> bool {
        READ_ONLY_COMMANDS.contains(&self.name.as_str())
    }

    pub fn is_publish(&self) -> bool {
        self.name == "PUBLISH"
    }

    pub fn is_transaction_control(&self) -> bool {
        matches!(self.name.as_str(), "MULTI" | "EXEC" | "DISCARD")
    }

    /// Checks the command name and its arguments without touching the store.
    pub fn validate_command_arguments(&self) -> Result<(), CommandError> {
        let arguments = self.arguments.clone();

        match self.name.as_str() {
            "PING" => PingArguments::parse(arguments).map(|_| ()),
            "ECHO" => EchoArguments::parse(arguments).map(|_| ()),
            "GET" => GetArguments::parse(arguments).map(|_| ()),
            "SET" => SetArguments::parse(arguments).map(|_| ()),
            "SETEX" => SetArguments::parse_setex(arguments).map(|_| ()),
            "DEL" => KeysArguments::parse(arguments, "del").map(|_| ()),
            "EXISTS" => KeysArguments::parse(arguments, "exists").map(|_| ()),
            "EXPIRE" => ExpireArguments::parse(arguments).map(|_| ()),
            "PERSIST" => KeyArgument::parse(arguments, "persist").map(|_| ()),
            "TTL" => KeyArgument::parse(arguments, "ttl").map(|_| ()),
            "PTTL" => KeyArgument::parse(arguments, "pttl").map(|_| ()),
            "TYPE" => TypeArguments::parse(arguments).map(|_| ()),
            "DBSIZE" => NoArguments::parse(arguments, "dbsize").map(|_| ()),
            "FLUSHALL" => NoArguments::parse(arguments, "flushall").map(|_| ()),
            "PUBLISH" => PublishArguments::parse(arguments).map(|_| ()),
            "RPUSH" => PushArrayOperations::parse(arguments, false).map(|_| ()),
            "LPUSH" => PushArrayOperations::parse(arguments, true).map(|_| ()),
            "LPOP" => LpopArguments::parse(arguments).map(|_| ()),
            "LRANGE" => LrangeArguments::parse(arguments).map(|_| ()),
            "LLEN" => LlenArguments::parse(arguments).map(|_| ()),
            "SADD" => SetMembersArguments::parse(arguments, "sadd").map(|_| ()),
            "SREM" => SetMembersArguments::parse(arguments, "srem").map(|_| ()),
            "SMEMBERS" => SetKeyArguments::parse(arguments, "smembers").map(|_| ()),
            "SCARD" => SetKeyArguments::parse(arguments, "scard").map(|_| ()),
            "SISMEMBER" => SismemberArguments::parse(arguments).map(|_| ()),
            "ZADD" => ZaddArguments::parse(arguments).map(|_| ()),
            "ZRANGE" => ZrangeArguments::parse(arguments).map(|_| ()),
            "ZSCORE" => ZmemberArguments::parse(arguments, "zscore", true).map(|_| ()),
            "ZREM" => ZmemberArguments::parse(arguments, "zrem", false).map(|_| ()),
            "ZCARD" => ZcardArguments::parse(arguments).map(|_| ()),
            "HSET" => HsetArguments::parse(arguments).map(|_| ()),
            "HGET" => HfieldArguments::parse(arguments, "hget", true).map(|_| ()),
            "HDEL" => HfieldArguments::parse(arguments, "hdel", false).map(|_| ()),
            "HGETALL" => HgetallArguments::parse(arguments).map(|_| ()),
            "GEOADD" => GeoaddArguments::parse(arguments).map(|_| ()),
            "GEODIST" => GeodistArguments::parse(arguments).map(|_| ()),
            "GEOPOS" => GeoposArguments::parse(arguments).map(|_| ()),
            "GEOSEARCH" => GeosearchArguments::parse(arguments).map(|_| ()),
            "PFADD" => PfaddArguments::parse(arguments).map(|_| ()),
            "PFCOUNT" => PfcountArguments::parse(arguments).map(|_| ()),
            "XADD" => XaddArguments::parse(arguments).map(|_| ()),
            "XLEN" => XlenArguments::parse(arguments).map(|_| ()),
            "XRANGE" => XrangeArguments::parse(arguments).map(|_| ()),
            "XREAD" => XreadArguments::parse(arguments).map(|_| ()),
            "XGROUP" => XgroupArguments::parse(arguments).map(|_| ()),
            "XREADGROUP" => XreadgroupArguments::parse(arguments).map(|_| ()),
            "XACK" => XackArguments::parse(arguments).map(|_| ()),
            "XPENDING" => XpendingArguments::parse(arguments).map(|_| ()),
            "MULTI" => MultiArguments::parse(arguments).map(|_| ()),
            "EXEC" => ExecArguments::parse(arguments).map(|_| ()),
            "DISCARD" => DiscardArguments::parse(arguments).map(|_| ()),
            _ => Err(CommandError::UnknownCommand(self.name.clone())),
        }
    }

    /// Runs a read-only command.
    pub fn handle_read(&self, store: &KeyValueStore) -> Result<Reply, CommandError> {
        let arguments = self.arguments.clone();

        match self.name.as_str() {
            "PING" => ping(arguments),
            "ECHO" => echo(arguments),
            "GET" => get(store, arguments),
            "EXISTS" => exists(store, arguments),
            "TTL" => ttl(store, arguments),
            "PTTL" => pttl(store, arguments),
            "TYPE" => type_command(store, arguments),
            "DBSIZE" => dbsize(store, arguments),
            "LRANGE" => lrange(store, arguments),
            "LLEN" => llen(store, arguments),
            "SMEMBERS" => smembers(store, arguments),
            "SISMEMBER" => sismember(store, arguments),
            "SCARD" => scard(store, arguments),
            "ZRANGE" => zrange(store, arguments),
            "ZSCORE" => zscore(store, arguments),
            "ZCARD" => zcard(store, arguments),
            "HGET" => hget(store, arguments),
            "HGETALL" => hgetall(store, arguments),
            "GEODIST" => geodist(store, arguments),
            "GEOPOS" => geopos(store, arguments),
            "GEOSEARCH" => geosearch(store, arguments),
            "PFCOUNT" => pfcount(store, arguments),
            "XLEN" => xlen(store, arguments),
            "XRANGE" => xrange(store, arguments),
            "XREAD" => xread(store, arguments),
            "XPENDING" => xpending(store, arguments),
            _ => self.handle_unroutable(),
        }
    }

    /// Runs any store command under exclusive access. Read-only commands are
    /// accepted too so a transaction can mix both.
    pub fn handle_write(&self, store: &mut KeyValueStore) -> Result<Reply, CommandError> {
        if self.is_read_only() {
            return self.handle_read(store);
        }

        let arguments = self.arguments.clone();

        match self.name.as_str() {
            "SET" => set(store, arguments),
            "SETEX" => setex(store, arguments),
            "DEL" => del(store, arguments),
            "EXPIRE" => expire(store, arguments),
            "PERSIST" => persist(store, arguments),
            "FLUSHALL" => flushall(store, arguments),
            "RPUSH" => rpush(store, arguments),
            "LPUSH" => lpush(store, arguments),
            "LPOP" => lpop(store, arguments),
            "SADD" => sadd(store, arguments),
            "SREM" => srem(store, arguments),
            "ZADD" => zadd(store, arguments),
            "ZREM" => zrem(store, arguments),
            "HSET" => hset(store, arguments),
            "HDEL" => hdel(store, arguments),
            "GEOADD" => geoadd(store, arguments),
            "PFADD" => pfadd(store, arguments),
            "XADD" => xadd(store, arguments),
            "XGROUP" => xgroup(store, arguments),
            "XREADGROUP" => xreadgroup(store, arguments),
            "XACK" => xack(store, arguments),
            _ => self.handle_unroutable(),
        }
    }

    fn handle_unroutable(&self) -> Result<Reply, CommandError> {
        if self.is_transaction_control() {
            return Err(CommandError::InvalidArgument(format!(
                "{} is only available inside a session",
                self.name
            )));
        }

        Err(CommandError::UnknownCommand(self.name.clone()))
    }

    /// The stream key an XADD appends to, so blocked readers can be woken.
    pub fn appended_stream(&self) -> Option<&str> {
        if self.name != "XADD" {
            return None;
        }

        self.arguments.first().map(|key| key.as_str())
    }

    /// The BLOCK option and stream keys of an XREAD or XREADGROUP, if it asked to block.
    pub fn blocking_request(&self) -> Option<BlockingRequest> {
        let (block_ms, keys) = match self.name.as_str() {
            "XREAD" => {
                let parsed = XreadArguments::parse(self.arguments.clone()).ok()?;
                (parsed.options.block_ms?, parsed.keys())
            }
            "XREADGROUP" => {
                let parsed = XreadgroupArguments::parse(self.arguments.clone()).ok()?;
                (parsed.options.block_ms?, parsed.keys())
            }
            _ => return None,
        };

        Some(BlockingRequest { block_ms, keys })
    }
}
