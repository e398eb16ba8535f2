// GitHub emoji shortcodes, sorted by name for binary search.
// Derived from the gemoji list; each entry is (name, emoji sequence).

pub(crate) static EMOJI: &[(&str, &str)] = &[
    ("+1", "👍"),
    ("-1", "👎"),
    ("100", "💯"),
    ("airplane", "✈️"),
    ("alien", "👽"),
    ("angry", "😠"),
    ("apple", "🍎"),
    ("art", "🎨"),
    ("baby", "👶"),
    ("balloon", "🎈"),
    ("banana", "🍌"),
    ("bear", "🐻"),
    ("beer", "🍺"),
    ("beers", "🍻"),
    ("bell", "🔔"),
    ("bike", "🚲"),
    ("birthday", "🎂"),
    ("blush", "😊"),
    ("boat", "⛵"),
    ("bomb", "💣"),
    ("book", "📖"),
    ("books", "📚"),
    ("boom", "💥"),
    ("brain", "🧠"),
    ("bread", "🍞"),
    ("broken_heart", "💔"),
    ("bug", "🐛"),
    ("bulb", "💡"),
    ("bus", "🚌"),
    ("butterfly", "🦋"),
    ("cake", "🍰"),
    ("camera", "📷"),
    ("car", "🚗"),
    ("cat", "🐱"),
    ("cherries", "🍒"),
    ("chicken", "🐔"),
    ("clap", "👏"),
    ("cloud", "☁️"),
    ("coffee", "☕"),
    ("confused", "😕"),
    ("cow", "🐮"),
    ("crown", "👑"),
    ("cry", "😢"),
    ("dart", "🎯"),
    ("dash", "💨"),
    ("dog", "🐶"),
    ("dolphin", "🐬"),
    ("door", "🚪"),
    ("dragon", "🐉"),
    ("droplet", "💧"),
    ("ear", "👂"),
    ("egg", "🥚"),
    ("envelope", "✉️"),
    ("eye", "👁️"),
    ("eyes", "👀"),
    ("fire", "🔥"),
    ("fireworks", "🎆"),
    ("fish", "🐟"),
    ("fist", "✊"),
    ("flushed", "😳"),
    ("frog", "🐸"),
    ("gem", "💎"),
    ("ghost", "👻"),
    ("gift", "🎁"),
    ("goat", "🐐"),
    ("grin", "😁"),
    ("grinning", "😀"),
    ("guitar", "🎸"),
    ("hamburger", "🍔"),
    ("hammer", "🔨"),
    ("handshake", "🤝"),
    ("heart", "❤️"),
    ("heart_eyes", "😍"),
    ("heartbeat", "💓"),
    ("herb", "🌿"),
    ("horse", "🐴"),
    ("house", "🏠"),
    ("imp", "👿"),
    ("innocent", "😇"),
    ("jack_o_lantern", "🎃"),
    ("joy", "😂"),
    ("key", "🔑"),
    ("kiss", "💋"),
    ("kissing_heart", "😘"),
    ("koala", "🐨"),
    ("laughing", "😆"),
    ("leaves", "🍃"),
    ("lemon", "🍋"),
    ("lips", "👄"),
    ("lock", "🔒"),
    ("mag", "🔍"),
    ("maple_leaf", "🍁"),
    ("mask", "😷"),
    ("megaphone", "📣"),
    ("memo", "📝"),
    ("microphone", "🎤"),
    ("moneybag", "💰"),
    ("monkey", "🐒"),
    ("mouse", "🐭"),
    ("muscle", "💪"),
    ("mushroom", "🍄"),
    ("musical_note", "🎵"),
    ("neutral_face", "😐"),
    ("nose", "👃"),
    ("notebook", "📓"),
    ("ocean", "🌊"),
    ("octopus", "🐙"),
    ("ok_hand", "👌"),
    ("open_mouth", "😮"),
    ("owl", "🦉"),
    ("palm_tree", "🌴"),
    ("panda_face", "🐼"),
    ("paperclip", "📎"),
    ("peach", "🍑"),
    ("penguin", "🐧"),
    ("pensive", "😔"),
    ("pig", "🐷"),
    ("pizza", "🍕"),
    ("point_down", "👇"),
    ("point_left", "👈"),
    ("point_right", "👉"),
    ("pray", "🙏"),
    ("purple_heart", "💜"),
    ("question", "❓"),
    ("rabbit", "🐰"),
    ("rage", "😡"),
    ("rainbow", "🌈"),
    ("raised_hands", "🙌"),
    ("relieved", "😌"),
    ("ribbon", "🎀"),
    ("ring", "💍"),
    ("robot", "🤖"),
    ("rocket", "🚀"),
    ("rose", "🌹"),
    ("santa", "🎅"),
    ("scream", "😱"),
    ("seedling", "🌱"),
    ("shark", "🦈"),
    ("sheep", "🐑"),
    ("ship", "🚢"),
    ("skull", "💀"),
    ("sleeping", "😴"),
    ("smile", "😄"),
    ("smiley", "😃"),
    ("smirk", "😏"),
    ("snail", "🐌"),
    ("snake", "🐍"),
    ("snowflake", "❄️"),
    ("snowman", "⛄"),
    ("sob", "😭"),
    ("soccer", "⚽"),
    ("sparkles", "✨"),
    ("star", "⭐"),
    ("star2", "🌟"),
    ("strawberry", "🍓"),
    ("sunflower", "🌻"),
    ("sunglasses", "😎"),
    ("sunny", "☀️"),
    ("sweat", "😓"),
    ("sweat_smile", "😅"),
    ("tada", "🎉"),
    ("tangerine", "🍊"),
    ("taxi", "🚕"),
    ("tea", "🍵"),
    ("telescope", "🔭"),
    ("thinking", "🤔"),
    ("thought_balloon", "💭"),
    ("thumbsdown", "👎"),
    ("thumbsup", "👍"),
    ("tiger", "🐯"),
    ("tomato", "🍅"),
    ("tongue", "👅"),
    ("tornado", "🌪️"),
    ("trophy", "🏆"),
    ("truck", "🚚"),
    ("tulip", "🌷"),
    ("turtle", "🐢"),
    ("tv", "📺"),
    ("two_hearts", "💕"),
    ("umbrella", "☔"),
    ("unamused", "😒"),
    ("unicorn", "🦄"),
    ("v", "✌️"),
    ("violin", "🎻"),
    ("volcano", "🌋"),
    ("wave", "👋"),
    ("whale", "🐳"),
    ("wink", "😉"),
    ("wolf", "🐺"),
    ("worried", "😟"),
    ("wrench", "🔧"),
    ("x", "❌"),
    ("yellow_heart", "💛"),
    ("yum", "😋"),
    ("zap", "⚡"),
    ("zzz", "💤"),
];
