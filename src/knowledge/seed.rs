//! Built-in facts

use super::KnowledgeNode;

fn leaf(key: &str, value: &str) -> (String, KnowledgeNode) {
    (key.to_string(), KnowledgeNode::Leaf(value.to_string()))
}

fn category(key: &str, children: Vec<(String, KnowledgeNode)>) -> (String, KnowledgeNode) {
    (key.to_string(), KnowledgeNode::Category(children))
}

pub(super) fn knowledge() -> Vec<(String, KnowledgeNode)> {
    vec![
        category("mathematics", vec![
            category("basic_operations", vec![
                leaf("addition", "Adding numbers together. Example: 2 + 3 = 5"),
                leaf("subtraction", "Taking one number away from another. Example: 5 - 2 = 3"),
                leaf("multiplication", "Repeated addition. Example: 3 × 4 = 12"),
                leaf("division", "Splitting into equal parts. Example: 12 ÷ 3 = 4"),
            ]),
            category("algebra", vec![
                leaf("variables", "Letters representing unknown numbers (x, y, z)"),
                leaf("equations", "Mathematical statements with equal signs"),
                leaf("quadratic_formula", "x = (-b ± √(b²-4ac)) / 2a for ax² + bx + c = 0"),
            ]),
            category("geometry", vec![
                leaf("circle_area", "Area = π × r² where r is radius"),
                leaf("triangle_area", "Area = ½ × base × height"),
                leaf("pythagorean_theorem", "a² + b² = c² for right triangles"),
            ]),
        ]),
        category("science", vec![
            category("physics", vec![
                leaf("gravity", "Force that attracts objects toward each other. Earth's gravity is 9.8 m/s²"),
                leaf("speed_of_light", "299,792,458 meters per second in vacuum"),
                leaf("newton_laws", "Three laws of motion describing relationship between forces and motion"),
                leaf("energy_conservation", "Energy cannot be created or destroyed, only transformed"),
            ]),
            category("chemistry", vec![
                leaf("periodic_table", "Organized chart of all chemical elements by atomic number"),
                leaf("water_formula", "H₂O - two hydrogen atoms bonded to one oxygen atom"),
                leaf("ph_scale", "Measures acidity/alkalinity from 0-14, 7 is neutral"),
                leaf("atomic_structure", "Atoms have protons, neutrons in nucleus, electrons in shells"),
            ]),
            category("biology", vec![
                leaf("cell_theory", "All living things are made of cells, basic unit of life"),
                leaf("DNA", "Genetic material containing instructions for all living organisms"),
                leaf("evolution", "Process by which species change over time through natural selection"),
                leaf("photosynthesis", "Plants convert sunlight, CO₂, and water into glucose and oxygen"),
            ]),
        ]),
        category("history", vec![
            category("ancient", vec![
                leaf("egypt", "Ancient civilization along Nile River, built pyramids, ruled by pharaohs"),
                leaf("rome", "Powerful empire from 27 BC to 476 AD, influenced law, government, architecture"),
                leaf("greece", "Birthplace of democracy, philosophy, theater, and Olympic Games"),
            ]),
            category("modern", vec![
                leaf("world_war_2", "Global conflict 1939-1945, involved most nations, ended with Allied victory"),
                leaf("industrial_revolution", "Period of major technological advancement, began in Britain 1760s"),
                leaf("renaissance", "Cultural rebirth in Europe 14th-17th centuries, art and learning flourished"),
            ]),
        ]),
        category("geography", vec![
            category("continents", vec![
                leaf("asia", "Largest continent, home to China, India, Japan, and many other countries"),
                leaf("africa", "Second largest continent, birthplace of humanity, diverse cultures"),
                leaf("europe", "Small but influential continent, many developed nations"),
                leaf("north_america", "Includes USA, Canada, Mexico, and Central America"),
                leaf("south_america", "Home to Amazon rainforest, Andes mountains"),
                leaf("australia", "Smallest continent, also a country, unique wildlife"),
                leaf("antarctica", "Southernmost continent, covered in ice, no permanent residents"),
            ]),
            category("capitals", vec![
                leaf("france", "Paris"),
                leaf("japan", "Tokyo"),
                leaf("brazil", "Brasília"),
                leaf("australia", "Canberra"),
                leaf("canada", "Ottawa"),
                leaf("germany", "Berlin"),
                leaf("italy", "Rome"),
                leaf("spain", "Madrid"),
                leaf("russia", "Moscow"),
                leaf("china", "Beijing"),
                leaf("india", "New Delhi"),
                leaf("uk", "London"),
            ]),
        ]),
        category("technology", vec![
            category("programming", vec![
                leaf("python", "High-level programming language, great for beginners and professionals"),
                leaf("javascript", "Programming language for web development, runs in browsers"),
                leaf("html", "Markup language for creating web pages and applications"),
                leaf("algorithm", "Step-by-step procedure for solving problems or performing tasks"),
            ]),
            category("internet", vec![
                leaf("www", "World Wide Web, system of interlinked hypertext documents"),
                leaf("email", "Electronic mail, method of exchanging digital messages"),
                leaf("social_media", "Online platforms for sharing content and connecting with others"),
            ]),
        ]),
        category("health", vec![
            category("nutrition", vec![
                leaf("vitamins", "Essential nutrients needed in small amounts for proper body function"),
                leaf("protein", "Nutrients that build and repair tissues, found in meat, beans, nuts"),
                leaf("carbohydrates", "Body's main source of energy, found in grains, fruits, vegetables"),
                leaf("water", "Essential for life, adults should drink about 8 glasses per day"),
            ]),
            category("exercise", vec![
                leaf("cardio", "Exercise that increases heart rate, improves cardiovascular health"),
                leaf("strength_training", "Exercise using resistance to build muscle strength"),
                leaf("flexibility", "Range of motion in joints, improved through stretching"),
            ]),
        ]),
        category("programming", vec![
            leaf("python", "Python is a versatile, high-level programming language known for its readability and broad library support. It is widely used in web development, data science, automation, and AI."),
            leaf("javascript", "JavaScript is a dynamic scripting language primarily used for interactive web development. It runs in browsers and is essential for front-end development."),
            leaf("variables", "Variables are used to store data values. In Python, you declare a variable by assigning a value to a name, e.g., x = 5."),
            leaf("functions", "Functions are reusable blocks of code that perform a specific task. In Python, you define a function using the def keyword."),
            leaf("loops", "Loops are used to repeat a block of code multiple times. Common types are for-loops and while-loops."),
            leaf("conditionals", "Conditionals (if, elif, else) allow you to execute code based on certain conditions."),
            leaf("oop", "Object-Oriented Programming (OOP) is a paradigm based on objects and classes. It helps organize code and promote reuse."),
        ]),
    ]
}
